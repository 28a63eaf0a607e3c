pub mod convert;
pub mod info;
pub mod resample;
pub mod validate;
