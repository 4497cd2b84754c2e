use hydroeval_macros::Columns;

#[derive(Debug, Clone, Copy, Columns)]
pub struct Record {
    pub prcp: f64,
    pub tmax: f64,
    pub tmin: f64,
}

fn main() {
    let r = Record::from_values(&[2.5, 18.0, 4.0]).unwrap();
    let mut table = RecordTable::with_capacity(10);
    table.push(&r);
    assert_eq!(table.len(), 1);
    assert!(!table.is_empty());
    assert_eq!(table.column("tmax"), Some(&[18.0][..]));
    assert_eq!(table.column("swe"), None);
    assert_eq!(Record::field_names(), &["prcp", "tmax", "tmin"]);
    assert!(Record::from_values(&[1.0]).is_none());
}
