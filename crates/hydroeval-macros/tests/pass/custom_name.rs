use hydroeval_macros::Columns;

#[derive(Debug, Clone, Copy, Columns)]
#[columns(table_name = "Meteo")]
pub struct Day {
    pub prcp: f64,
    pub srad: f64,
}

fn main() {
    let mut table = Meteo::with_capacity(2);
    table.push(&Day { prcp: 0.0, srad: 250.0 });
    table.push(&Day { prcp: 3.1, srad: 120.0 });
    assert_eq!(table.len(), 2);
    assert_eq!(table.prcp, vec![0.0, 3.1]);
}
