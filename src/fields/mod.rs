pub mod csidh;
pub mod fp511;
