use std::collections::BTreeMap;

use anyhow::anyhow;
use clim_core::qc::{VALUE_FROM_DAILY, VALUE_FROM_MSM};
use clim_core::{
    FieldGroup, FieldId, FieldValue, Number, PeriodDesc, PeriodRecord, PeriodType, QcCode,
    Station, StationId,
};
use clim_reconcile::origin::Origin;
use clim_reconcile::PriorityPolicy;
use clim_session::{
    CompletionPayload, CompletionSink, FieldEdit, OverwriteChoice, PeriodReport, Prompter,
    ReportDataProvider, StationSession,
};

struct Messages(BTreeMap<StationId, PeriodRecord>);

impl ReportDataProvider for Messages {
    fn monthly_summary(&self, station_id: StationId, _: &PeriodDesc) -> anyhow::Result<PeriodRecord> {
        self.0
            .get(&station_id)
            .cloned()
            .ok_or_else(|| anyhow!("no monthly summary for {}", station_id))
    }
}

struct Scripted {
    discard: bool,
    overwrite: OverwriteChoice,
    discard_asked: usize,
    overwrite_asked: usize,
}

impl Scripted {
    fn new(discard: bool, overwrite: OverwriteChoice) -> Self {
        Scripted {
            discard,
            overwrite,
            discard_asked: 0,
            overwrite_asked: 0,
        }
    }
}

impl Prompter for Scripted {
    fn confirm_discard(&mut self, _: &Station) -> bool {
        self.discard_asked += 1;
        self.discard
    }
    fn overwrite_daily_with_msm(&mut self, _: &Station) -> OverwriteChoice {
        self.overwrite_asked += 1;
        self.overwrite
    }
    fn confirm_accept(&mut self) -> bool {
        true
    }
    fn confirm_abort(&mut self) -> bool {
        true
    }
    fn confirm_close(&mut self) -> bool {
        false
    }
}

#[derive(Default)]
struct Collected {
    payload: Option<CompletionPayload>,
    aborted: Option<String>,
}

impl CompletionSink for Collected {
    fn complete(&mut self, payload: CompletionPayload) -> anyhow::Result<()> {
        self.payload = Some(payload);
        Ok(())
    }
    fn abort(&mut self, reason: &str) -> anyhow::Result<()> {
        self.aborted = Some(reason.to_string());
        Ok(())
    }
}

fn value(field: FieldId, scalar: Number, dates: &[&str], qc: QcCode) -> FieldValue {
    let occurrences = dates.iter().map(|d| d.parse().unwrap()).collect();
    FieldValue::new(field.spec(), scalar, occurrences, qc).unwrap()
}

fn station(id: StationId, icao: &str) -> Station {
    Station {
        inform_id: id,
        icao: icao.to_string(),
        name: format!("Station {}", icao),
    }
}

/// Three stations; station 1 has matching max temperatures, station 2 has
/// a max temperature date mismatch and a precipitation total only the
/// monthly summary agrees with, station 3 has no monthly summary.
fn fixture() -> (PeriodReport, Messages) {
    let period = PeriodDesc::month(PeriodType::MonthlyNwws, 2023, 7).unwrap();
    let mut daily = BTreeMap::new();
    let mut msm = BTreeMap::new();

    let mut d1 = PeriodRecord::missing(1);
    let mut m1 = PeriodRecord::missing(1);
    d1.set(FieldId::MaxTemp, value(FieldId::MaxTemp, Number::Int(88), &["20230705"], VALUE_FROM_DAILY));
    m1.set(FieldId::MaxTemp, value(FieldId::MaxTemp, Number::Int(88), &["20230705"], VALUE_FROM_MSM));
    d1.set(FieldId::AvgWindSpeed, value(FieldId::AvgWindSpeed, Number::Float(7.3), &[], VALUE_FROM_DAILY));
    d1.set(FieldId::PrecipTotal, value(FieldId::PrecipTotal, Number::Float(1.234), &[], VALUE_FROM_DAILY));
    m1.set(FieldId::PrecipTotal, value(FieldId::PrecipTotal, Number::Float(1.234), &[], VALUE_FROM_MSM));
    daily.insert(1, d1);
    msm.insert(1, m1);

    let mut d2 = PeriodRecord::missing(2);
    let mut m2 = PeriodRecord::missing(2);
    d2.set(FieldId::MaxTemp, value(FieldId::MaxTemp, Number::Int(88), &["20230705"], VALUE_FROM_DAILY));
    m2.set(FieldId::MaxTemp, value(FieldId::MaxTemp, Number::Int(88), &["20230712"], VALUE_FROM_MSM));
    d2.set(FieldId::PrecipTotal, value(FieldId::PrecipTotal, Number::Float(2.31), &[], VALUE_FROM_DAILY));
    m2.set(FieldId::PrecipTotal, value(FieldId::PrecipTotal, Number::Float(2.35), &[], VALUE_FROM_MSM));
    daily.insert(2, d2);
    msm.insert(2, m2);

    let mut d3 = PeriodRecord::missing(3);
    d3.set(
        FieldId::PrecipMax24h,
        value(FieldId::PrecipMax24h, Number::Trace, &["20230710-20230711"], VALUE_FROM_DAILY),
    );
    daily.insert(3, d3);

    let report = PeriodReport {
        period,
        stations: vec![station(1, "KAAA"), station(2, "KBBB"), station(3, "KCCC")],
        daily,
    };
    (report, Messages(msm))
}

fn open(prompter: Scripted, writable: bool) -> StationSession<Messages, Scripted, bool> {
    let (report, messages) = fixture();
    StationSession::new(report, PriorityPolicy::default(), messages, prompter, writable)
}

#[test]
fn matched_max_temperature_resolves_to_daily() {
    let mut session = open(Scripted::new(true, OverwriteChoice::No), true);
    session.select_station(1).unwrap();

    let shown = session.display().field(FieldId::MaxTemp);
    assert_eq!(shown.text, "88");
    assert_eq!(shown.origin, Origin::DailyDatabase);
    assert_eq!(shown.qc, VALUE_FROM_DAILY);
    assert!(!shown.mismatch);
    assert!(!session.display().dialog_mismatch());
}

#[test]
fn date_mismatch_flags_field_tab_and_dialog() {
    let mut session = open(Scripted::new(true, OverwriteChoice::No), true);
    session.select_station(2).unwrap();

    let shown = session.display().field(FieldId::MaxTemp);
    assert!(shown.mismatch);
    assert_eq!(shown.origin, Origin::MonthlySummaryMessage);
    assert_eq!(shown.occurrences[0].start.unwrap().to_string(), "2023-07-12");
    assert!(session.display().tab_mismatch(FieldGroup::Temperature));
    assert!(!session.display().tab_mismatch(FieldGroup::Wind));
    assert!(session.display().dialog_mismatch());
}

#[test]
fn precipitation_selects_monthly_summary_on_first_visit() {
    let mut session = open(Scripted::new(true, OverwriteChoice::No), true);
    session.select_station(2).unwrap();

    let shown = session.display().field(FieldId::PrecipTotal);
    assert_eq!(shown.text, "2.35");
    assert_eq!(shown.origin, Origin::MonthlySummaryMessage);
    assert_eq!(shown.qc_description(), "Method: Monthly Summary Message");
    assert_eq!(
        session.saved(2).unwrap().get(FieldId::PrecipTotal).scalar,
        Number::Float(2.35)
    );
}

#[test]
fn precise_amount_keeps_monthly_summary_provenance() {
    let mut session = open(Scripted::new(true, OverwriteChoice::No), true);
    session.select_station(1).unwrap();

    let shown = session.display().field(FieldId::PrecipTotal);
    assert_eq!(shown.text, "1.23");
    assert_eq!(shown.origin, Origin::MonthlySummaryMessage);
    assert_eq!(shown.qc, VALUE_FROM_MSM);
    assert!(!shown.mismatch);

    let saved = session.saved(1).unwrap().get(FieldId::PrecipTotal);
    assert_eq!(saved.scalar, Number::Float(1.234));
    assert_eq!(saved.qc, VALUE_FROM_MSM);
}

#[test]
fn operator_save_then_reload_keeps_origins() {
    let mut session = open(Scripted::new(true, OverwriteChoice::No), true);
    session.select_station(1).unwrap();
    session
        .apply(FieldEdit::SelectOrigin {
            field: FieldId::MaxTemp,
            origin: Origin::MonthlySummaryMessage,
        })
        .unwrap();
    let before: Vec<Origin> = FieldId::ALL
        .iter()
        .map(|f| session.display().field(*f).origin)
        .collect();
    assert_eq!(before[FieldId::MaxTemp.index()], Origin::MonthlySummaryMessage);

    session.save().unwrap();
    assert_eq!(session.saved(1).unwrap().get(FieldId::MaxTemp).qc, VALUE_FROM_MSM);
    session.select_station(1).unwrap();

    let after: Vec<Origin> = FieldId::ALL
        .iter()
        .map(|f| session.display().field(*f).origin)
        .collect();
    assert_eq!(before, after);
    assert_eq!(session.display().field(FieldId::MaxTemp).qc, VALUE_FROM_MSM);
}

#[test]
fn declined_discard_keeps_station_and_edits() {
    let mut session = open(Scripted::new(false, OverwriteChoice::No), true);
    session.select_station(1).unwrap();
    session
        .apply(FieldEdit::Text {
            field: FieldId::MaxTemp,
            text: "91".to_string(),
        })
        .unwrap();

    assert!(!session.select_station(2).unwrap());
    assert_eq!(session.prompter().discard_asked, 1);
    assert_eq!(session.current_station().unwrap().inform_id, 1);
    assert!(session.unsaved_changes());
    assert_eq!(session.display().field(FieldId::MaxTemp).text, "91");
}

#[test]
fn failed_monthly_summary_fetch_means_daily() {
    let mut session = open(Scripted::new(true, OverwriteChoice::No), true);
    session.select_station(3).unwrap();

    assert!(session.monthly_summary(3).is_none());
    let shown = session.display().field(FieldId::PrecipMax24h);
    assert_eq!(shown.text, "T");
    assert_eq!(shown.origin, Origin::DailyDatabase);
    assert!(!session.display().dialog_mismatch());
}

#[test]
fn reload_resolves_the_same_origins() {
    let mut session = open(Scripted::new(true, OverwriteChoice::No), true);
    for id in [1, 2, 3] {
        session.select_station(id).unwrap();
        let first: Vec<Origin> = FieldId::ALL
            .iter()
            .map(|f| session.display().field(*f).origin)
            .collect();
        let saved = session.saved(id).unwrap().clone();

        let other = if id == 3 { 1 } else { id + 1 };
        session.select_station(other).unwrap();
        session.select_station(id).unwrap();

        let again: Vec<Origin> = FieldId::ALL
            .iter()
            .map(|f| session.display().field(*f).origin)
            .collect();
        assert_eq!(first, again, "station {}", id);
        assert_eq!(&saved, session.saved(id).unwrap());
    }
}

#[test]
fn saved_values_keep_qc_invariant() {
    let mut session = open(Scripted::new(true, OverwriteChoice::No), true);
    for id in [1, 2, 3] {
        session.select_station(id).unwrap();
        for (field, value) in session.saved(id).unwrap().iter() {
            assert!(value.is_qc_consistent(field.spec()), "{} at {}", field, id);
        }
    }
}

#[test]
fn operator_save_commits_other_and_advances() {
    let mut session = open(Scripted::new(true, OverwriteChoice::No), true);
    session.select_station(1).unwrap();
    session
        .apply(FieldEdit::Text {
            field: FieldId::AvgWindSpeed,
            text: "8.1".to_string(),
        })
        .unwrap();
    session.save().unwrap();

    let saved = session.saved(1).unwrap().get(FieldId::AvgWindSpeed);
    assert_eq!(saved.scalar, Number::Float(8.1));
    assert_eq!(saved.qc, QcCode::ManualEntry);
    assert_eq!(session.other(1).unwrap().get(FieldId::AvgWindSpeed), saved);
    assert_eq!(session.current_station().unwrap().inform_id, 2);
    assert!(!session.unsaved_changes());
    assert_eq!(session.prompter().discard_asked, 0);
}

#[test]
fn typed_missing_saves_missing_qc() {
    let mut session = open(Scripted::new(true, OverwriteChoice::No), true);
    session.select_station(1).unwrap();
    session
        .apply(FieldEdit::Text {
            field: FieldId::AvgWindSpeed,
            text: "M".to_string(),
        })
        .unwrap();
    session.save().unwrap();
    assert_eq!(session.saved(1).unwrap().get(FieldId::AvgWindSpeed).qc, QcCode::Missing);
}

#[test]
fn invalid_text_fails_save_without_writing() {
    let mut session = open(Scripted::new(true, OverwriteChoice::No), true);
    session.select_station(1).unwrap();
    let before = session.saved(1).unwrap().clone();
    session
        .apply(FieldEdit::Text {
            field: FieldId::AvgWindSpeed,
            text: "fast".to_string(),
        })
        .unwrap();

    assert!(session.save().is_err());
    assert_eq!(session.saved(1).unwrap(), &before);
    assert_eq!(session.current_station().unwrap().inform_id, 1);
    assert!(session.unsaved_changes());
}

#[test]
fn save_wraps_to_first_station() {
    let mut session = open(Scripted::new(true, OverwriteChoice::No), true);
    session.select_station(3).unwrap();
    session.save().unwrap();
    assert_eq!(session.current_station().unwrap().inform_id, 1);
}

#[test]
fn overwrite_prompt_answers() {
    let mut session = open(Scripted::new(true, OverwriteChoice::Yes), true);
    session.select_station(2).unwrap();
    session.save().unwrap();
    assert_eq!(session.prompter().overwrite_asked, 1);
    assert!(session.approved_stations().contains(&2));

    // Approved stations are not asked again.
    session.select_station(2).unwrap();
    session.save().unwrap();
    assert_eq!(session.prompter().overwrite_asked, 1);

    let mut session = open(Scripted::new(true, OverwriteChoice::YesToAll), true);
    session.select_station(2).unwrap();
    session.save().unwrap();
    assert_eq!(session.approved_stations().len(), 3);

    let mut session = open(Scripted::new(true, OverwriteChoice::No), true);
    session.select_station(2).unwrap();
    session.save().unwrap();
    assert!(session.approved_stations().is_empty());
}

#[test]
fn no_prompt_without_mismatch() {
    let mut session = open(Scripted::new(true, OverwriteChoice::Yes), true);
    session.select_station(1).unwrap();
    session.save().unwrap();
    assert_eq!(session.prompter().overwrite_asked, 0);
}

#[test]
fn occurrence_edit_switches_to_other() {
    let mut session = open(Scripted::new(true, OverwriteChoice::No), true);
    session.select_station(1).unwrap();
    let mut input = session.display().field(FieldId::MaxTemp).occurrences[0];
    input.start = chrono::NaiveDate::from_ymd_opt(2023, 7, 6);
    session
        .apply(FieldEdit::Occurrence {
            field: FieldId::MaxTemp,
            slot: 0,
            input,
        })
        .unwrap();
    assert_eq!(session.display().field(FieldId::MaxTemp).origin, Origin::Other);
    session.save().unwrap();

    let saved = session.saved(1).unwrap().get(FieldId::MaxTemp);
    assert_eq!(saved.qc, QcCode::ManualEntry);
    assert_eq!(saved.occurrence_slice()[0].to_string(), "20230706");
}

#[test]
fn read_only_session_cannot_save_or_accept() {
    let mut session = open(Scripted::new(true, OverwriteChoice::No), false);
    session.select_station(1).unwrap();
    assert!(session.save().is_err());
    let mut sink = Collected::default();
    assert!(session.accept_and_continue(&mut sink).is_err());
    assert!(session.should_close());
}

#[test]
fn accept_sends_saved_or_daily_records() {
    let mut session = open(Scripted::new(true, OverwriteChoice::Yes), true);
    session.select_station(2).unwrap();
    session.save().unwrap();

    let mut sink = Collected::default();
    assert!(session.accept_and_continue(&mut sink).unwrap());
    let payload = sink.payload.unwrap();
    assert_eq!(payload.records.len(), 3);
    assert_eq!(
        payload.records[1].get(FieldId::PrecipTotal).scalar,
        Number::Float(2.35)
    );
    assert_eq!(
        payload.original[1].get(FieldId::PrecipTotal).scalar,
        Number::Float(2.31)
    );
    assert!(payload.approved_stations.contains(&2));
    assert!(session.should_close());

    let json = serde_json::to_value(&payload.records[0]).unwrap();
    assert_eq!(json["station_id"], 1);
}

#[test]
fn abort_signals_reason() {
    let mut session = open(Scripted::new(true, OverwriteChoice::No), true);
    assert!(!session.should_close());
    let mut sink = Collected::default();
    assert!(session.abort(&mut sink, "operator cancelled").unwrap());
    assert_eq!(sink.aborted.as_deref(), Some("operator cancelled"));
    assert!(session.should_close());
}
