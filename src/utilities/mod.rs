pub mod bn;
pub mod test_utils;
