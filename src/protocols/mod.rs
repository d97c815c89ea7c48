pub mod csidh;
pub mod csidh_parameters;
