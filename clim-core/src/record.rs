use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Serialize, Serializer};

use crate::field::FieldId;
use crate::station::StationId;
use crate::value::FieldValue;

/// Every catalogued field's value for one station and period.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodRecord {
    station_id: StationId,
    values: Vec<FieldValue>,
}

impl PeriodRecord {
    pub fn missing(station_id: StationId) -> Self {
        PeriodRecord {
            station_id,
            values: FieldId::ALL
                .iter()
                .map(|f| FieldValue::missing(f.spec()))
                .collect(),
        }
    }

    pub fn station_id(&self) -> StationId {
        self.station_id
    }

    pub fn get(&self, field: FieldId) -> &FieldValue {
        &self.values[field.index()]
    }

    pub fn set(&mut self, field: FieldId, value: FieldValue) {
        self.values[field.index()] = value;
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldId, &FieldValue)> {
        FieldId::ALL.into_iter().zip(self.values.iter())
    }
}

struct FieldMap<'a>(&'a PeriodRecord);

impl Serialize for FieldMap<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(FieldId::COUNT))?;
        for (field, value) in self.0.iter() {
            map.serialize_entry(field.key(), value)?;
        }
        map.end()
    }
}

impl Serialize for PeriodRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("PeriodRecord", 2)?;
        state.serialize_field("station_id", &self.station_id)?;
        state.serialize_field("values", &FieldMap(self))?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::number::Number;
    use crate::qc::{QcCode, VALUE_FROM_MSM};

    #[test]
    fn test_missing_record_covers_catalogue() {
        let record = PeriodRecord::missing(7);
        assert_eq!(record.station_id(), 7);
        assert_eq!(record.iter().count(), FieldId::COUNT);
        assert!(record.iter().all(|(_, v)| v.qc == QcCode::Missing));
    }

    #[test]
    fn test_set_and_get() {
        let mut record = PeriodRecord::missing(1);
        let value = FieldValue::new(
            FieldId::PrecipTotal.spec(),
            Number::Float(2.35),
            vec![],
            VALUE_FROM_MSM,
        )
        .unwrap();
        record.set(FieldId::PrecipTotal, value.clone());
        assert_eq!(record.get(FieldId::PrecipTotal), &value);
        assert_eq!(record.get(FieldId::PrecipGe01).qc, QcCode::Missing);
    }

    #[test]
    fn test_serializes_values_by_key() {
        let record = PeriodRecord::missing(3);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["station_id"], 3);
        assert_eq!(json["values"]["max_temp"]["qc"], "Missing");
        assert_eq!(json["values"].as_object().unwrap().len(), FieldId::COUNT);
    }
}
