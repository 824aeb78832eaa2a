//! The catalogue of reconciled period fields.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::number::{
    Number, NumericKind, MISSING, MISSING_DEGREE_DAY, MISSING_FLOAT, MISSING_SYMBOL,
};
use crate::occurrence::OccurrenceShape;

/// The review tab a field belongs to. Each group has its own source priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FieldGroup {
    Temperature,
    Precipitation,
    Snow,
    Wind,
    SkyWeather,
}

impl FieldGroup {
    pub const ALL: [FieldGroup; 5] = [
        FieldGroup::Temperature,
        FieldGroup::Precipitation,
        FieldGroup::Snow,
        FieldGroup::Wind,
        FieldGroup::SkyWeather,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            FieldGroup::Temperature => "temperature",
            FieldGroup::Precipitation => "precipitation",
            FieldGroup::Snow => "snow",
            FieldGroup::Wind => "wind",
            FieldGroup::SkyWeather => "sky_weather",
        }
    }

    pub fn fields(self) -> impl Iterator<Item = FieldId> {
        FieldId::ALL.into_iter().filter(move |f| f.spec().group == self)
    }
}

impl fmt::Display for FieldGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for FieldGroup {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        FieldGroup::ALL
            .into_iter()
            .find(|g| g.key() == wanted)
            .ok_or_else(|| CoreError::UnknownGroup(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FieldId {
    // Temperature
    MaxTemp,
    AvgMaxTemp,
    MeanTemp,
    MaxTempGe90,
    MaxTempLe32,
    MinTemp,
    AvgMinTemp,
    MinTempLe32,
    MinTempLe0,
    HeatingDegreeDays,
    CoolingDegreeDays,
    MeanRelHumidity,
    // Precipitation
    PrecipTotal,
    PrecipMax24h,
    PrecipStormMax,
    PrecipMeanDaily,
    PrecipGe01,
    PrecipGe10,
    PrecipGe50,
    PrecipGe100,
    // Snow
    SnowTotal,
    SnowMax24h,
    SnowStormMax,
    SnowDepthMax,
    // Wind
    MaxWindSpeed,
    MaxGustSpeed,
    AvgWindSpeed,
    ResultantWindSpeed,
    ResultantWindDir,
    // Sky and weather
    PossibleSunshine,
    MeanSkyCover,
    FairDays,
    PartlyCloudyDays,
    MostlyCloudyDays,
    ThunderstormDays,
    FogDays,
}

impl FieldId {
    pub const COUNT: usize = 36;

    pub const ALL: [FieldId; FieldId::COUNT] = [
        FieldId::MaxTemp,
        FieldId::AvgMaxTemp,
        FieldId::MeanTemp,
        FieldId::MaxTempGe90,
        FieldId::MaxTempLe32,
        FieldId::MinTemp,
        FieldId::AvgMinTemp,
        FieldId::MinTempLe32,
        FieldId::MinTempLe0,
        FieldId::HeatingDegreeDays,
        FieldId::CoolingDegreeDays,
        FieldId::MeanRelHumidity,
        FieldId::PrecipTotal,
        FieldId::PrecipMax24h,
        FieldId::PrecipStormMax,
        FieldId::PrecipMeanDaily,
        FieldId::PrecipGe01,
        FieldId::PrecipGe10,
        FieldId::PrecipGe50,
        FieldId::PrecipGe100,
        FieldId::SnowTotal,
        FieldId::SnowMax24h,
        FieldId::SnowStormMax,
        FieldId::SnowDepthMax,
        FieldId::MaxWindSpeed,
        FieldId::MaxGustSpeed,
        FieldId::AvgWindSpeed,
        FieldId::ResultantWindSpeed,
        FieldId::ResultantWindDir,
        FieldId::PossibleSunshine,
        FieldId::MeanSkyCover,
        FieldId::FairDays,
        FieldId::PartlyCloudyDays,
        FieldId::MostlyCloudyDays,
        FieldId::ThunderstormDays,
        FieldId::FogDays,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn spec(self) -> &'static FieldSpec {
        &FIELD_SPECS[self.index()]
    }

    pub fn key(self) -> &'static str {
        self.spec().key
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for FieldId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        FieldId::ALL
            .into_iter()
            .find(|f| f.key() == wanted)
            .ok_or_else(|| CoreError::UnknownField(s.to_string()))
    }
}

/// Static description of one reconciled field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub id: FieldId,
    pub key: &'static str,
    pub label: &'static str,
    pub group: FieldGroup,
    pub kind: NumericKind,
    pub missing: Number,
    /// Decimal places both sides are rounded to before comparing.
    pub compare_decimals: Option<u32>,
    pub display_decimals: u32,
    pub occurrences: Option<(OccurrenceShape, usize)>,
    /// Whether a monthly summary message reports this field.
    pub has_msm: bool,
}

impl FieldSpec {
    /// Occurrence capacity; zero for fields without dates.
    pub fn capacity(&self) -> usize {
        self.occurrences.map(|(_, capacity)| capacity).unwrap_or(0)
    }

    pub fn is_missing(&self, value: &Number) -> bool {
        value.approx_eq(&self.missing, None)
    }

    /// Parse operator or fixture text; blank and `M` mean missing.
    pub fn parse(&self, text: &str) -> Result<Number, CoreError> {
        let trimmed = text.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(MISSING_SYMBOL) {
            return Ok(self.missing);
        }
        Number::parse(trimmed, self.kind)
    }

    pub fn format(&self, value: &Number) -> String {
        if self.is_missing(value) {
            return MISSING_SYMBOL.to_string();
        }
        value.format(self.display_decimals)
    }
}

const INT_MISSING: Number = Number::Int(MISSING);
const FLOAT_MISSING: Number = Number::Float(MISSING_FLOAT);
const DEGREE_DAY_MISSING: Number = Number::Int(MISSING_DEGREE_DAY);

const fn count(id: FieldId, key: &'static str, label: &'static str, group: FieldGroup, has_msm: bool) -> FieldSpec {
    FieldSpec {
        id,
        key,
        label,
        group,
        kind: NumericKind::Int,
        missing: INT_MISSING,
        compare_decimals: None,
        display_decimals: 0,
        occurrences: None,
        has_msm,
    }
}

const fn amount(id: FieldId, key: &'static str, label: &'static str, group: FieldGroup, has_msm: bool) -> FieldSpec {
    FieldSpec {
        id,
        key,
        label,
        group,
        kind: NumericKind::TraceFloat,
        missing: FLOAT_MISSING,
        compare_decimals: None,
        display_decimals: 2,
        occurrences: None,
        has_msm,
    }
}

const fn with_dates(spec: FieldSpec, shape: OccurrenceShape, capacity: usize) -> FieldSpec {
    FieldSpec {
        occurrences: Some((shape, capacity)),
        ..spec
    }
}

const fn mean(spec: FieldSpec, decimals: u32) -> FieldSpec {
    FieldSpec {
        kind: NumericKind::Float,
        missing: FLOAT_MISSING,
        compare_decimals: Some(decimals),
        display_decimals: decimals,
        ..spec
    }
}

const fn degree_days(spec: FieldSpec) -> FieldSpec {
    FieldSpec {
        missing: DEGREE_DAY_MISSING,
        ..spec
    }
}

const fn snow_precision(spec: FieldSpec) -> FieldSpec {
    FieldSpec {
        display_decimals: 1,
        ..spec
    }
}

use self::FieldGroup::{Precipitation as P, SkyWeather as S, Snow as N, Temperature as T, Wind as W};
use crate::occurrence::OccurrenceShape::{Day, DirectedDay, Span, SpanWithHours};

static FIELD_SPECS: [FieldSpec; FieldId::COUNT] = [
    with_dates(count(FieldId::MaxTemp, "max_temp", "Maximum Temperature", T, true), Day, 3),
    mean(count(FieldId::AvgMaxTemp, "avg_max_temp", "Average Maximum Temperature", T, true), 1),
    mean(count(FieldId::MeanTemp, "mean_temp", "Mean Temperature", T, true), 1),
    count(FieldId::MaxTempGe90, "max_temp_ge_90", "Days Max >= 90", T, true),
    count(FieldId::MaxTempLe32, "max_temp_le_32", "Days Max <= 32", T, true),
    with_dates(count(FieldId::MinTemp, "min_temp", "Minimum Temperature", T, true), Day, 3),
    mean(count(FieldId::AvgMinTemp, "avg_min_temp", "Average Minimum Temperature", T, true), 1),
    count(FieldId::MinTempLe32, "min_temp_le_32", "Days Min <= 32", T, true),
    count(FieldId::MinTempLe0, "min_temp_le_0", "Days Min <= 0", T, true),
    degree_days(count(FieldId::HeatingDegreeDays, "heating_degree_days", "Heating Degree Days", T, true)),
    degree_days(count(FieldId::CoolingDegreeDays, "cooling_degree_days", "Cooling Degree Days", T, true)),
    count(FieldId::MeanRelHumidity, "mean_rel_humidity", "Mean Relative Humidity", T, false),
    amount(FieldId::PrecipTotal, "precip_total", "Total Precipitation", P, true),
    with_dates(amount(FieldId::PrecipMax24h, "precip_max_24h", "Greatest 24-Hour Precipitation", P, true), Span, 3),
    with_dates(amount(FieldId::PrecipStormMax, "precip_storm_max", "Greatest Storm Total Precipitation", P, false), SpanWithHours, 3),
    amount(FieldId::PrecipMeanDaily, "precip_mean_daily", "Average Daily Precipitation", P, false),
    count(FieldId::PrecipGe01, "precip_ge_01", "Days Precip >= 0.01", P, true),
    count(FieldId::PrecipGe10, "precip_ge_10", "Days Precip >= 0.10", P, true),
    count(FieldId::PrecipGe50, "precip_ge_50", "Days Precip >= 0.50", P, true),
    count(FieldId::PrecipGe100, "precip_ge_100", "Days Precip >= 1.00", P, true),
    snow_precision(amount(FieldId::SnowTotal, "snow_total", "Total Snowfall", N, false)),
    with_dates(snow_precision(amount(FieldId::SnowMax24h, "snow_max_24h", "Greatest 24-Hour Snowfall", N, true)), Span, 3),
    with_dates(snow_precision(amount(FieldId::SnowStormMax, "snow_storm_max", "Greatest Storm Total Snowfall", N, false)), SpanWithHours, 3),
    with_dates(count(FieldId::SnowDepthMax, "snow_depth_max", "Greatest Snow Depth", N, true), Day, 3),
    with_dates(mean(count(FieldId::MaxWindSpeed, "max_wind_speed", "Maximum Wind Speed", W, false), 0), DirectedDay, 3),
    with_dates(mean(count(FieldId::MaxGustSpeed, "max_gust_speed", "Maximum Gust Speed", W, false), 0), DirectedDay, 3),
    mean(count(FieldId::AvgWindSpeed, "avg_wind_speed", "Average Wind Speed", W, false), 1),
    mean(count(FieldId::ResultantWindSpeed, "resultant_wind_speed", "Resultant Wind Speed", W, false), 1),
    count(FieldId::ResultantWindDir, "resultant_wind_dir", "Resultant Wind Direction", W, false),
    count(FieldId::PossibleSunshine, "possible_sunshine", "Percent Possible Sunshine", S, true),
    mean(count(FieldId::MeanSkyCover, "mean_sky_cover", "Average Sky Cover", S, false), 1),
    count(FieldId::FairDays, "fair_days", "Fair Days", S, true),
    count(FieldId::PartlyCloudyDays, "partly_cloudy_days", "Partly Cloudy Days", S, true),
    count(FieldId::MostlyCloudyDays, "mostly_cloudy_days", "Mostly Cloudy Days", S, true),
    count(FieldId::ThunderstormDays, "thunderstorm_days", "Thunderstorm Days", S, false),
    count(FieldId::FogDays, "fog_days", "Heavy Fog Days", S, false),
];
