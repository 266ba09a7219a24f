mod csv;

pub use csv::read_csv;
