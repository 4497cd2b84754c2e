use hydroeval_macros::Columns;

#[derive(Debug, Clone, Copy, Columns)]
pub struct BadRecord {
    pub prcp: f64,
    pub count: u32,
}

fn main() {}
