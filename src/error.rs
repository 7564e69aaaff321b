// Copyright (C) 2020-2024 Andy Kurnia.

// Errors only arise at the input boundary (parsing racks and boards,
// validating questions, building lexicons). The generator itself never fails.

pub struct SpotgenError {
    msg: String,
}

impl std::fmt::Display for SpotgenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.msg)
    }
}

impl std::fmt::Debug for SpotgenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SpotgenError({:?})", self.msg)
    }
}

impl std::error::Error for SpotgenError {}

pub fn new(msg: String) -> SpotgenError {
    SpotgenError { msg }
}

pub type BoxAnyError = Box<dyn std::error::Error>;
pub type Returns<T> = Result<T, BoxAnyError>;

#[macro_export]
macro_rules! return_error {
    ($error:expr) => {
        return Err($crate::error::new($error).into());
    };
}
