use super::error::Error;
use std::io::Read;
use std::str::FromStr;

/// The pristine memory image of an Intcode program.
///
/// Processors never run against this directly; every run gets its own copy from
/// [`Program::memory`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    pub data: Box<[i64]>,
}

impl Program {
    pub fn new(data: impl Into<Box<[i64]>>) -> Self {
        Program { data: data.into() }
    }

    pub fn parse(mut input: impl Read) -> Result<Self, Error> {
        let mut data_string = String::new();
        input.read_to_string(&mut data_string)?;
        let data = data_string
            .split(',')
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(i64::from_str)
            .collect::<Result<Vec<_>, _>>()?
            .into_boxed_slice();
        Ok(Program { data })
    }

    /// A fresh, independently owned copy of the image.
    pub fn memory(&self) -> Box<[i64]> {
        self.data.clone()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl From<Vec<i64>> for Program {
    fn from(data: Vec<i64>) -> Self {
        Program::new(data)
    }
}
