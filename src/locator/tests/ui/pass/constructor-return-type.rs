use std::fmt::{Display, Formatter, Result as FmtResult};

use locator::prelude::*;

#[derive(Debug)]
pub struct SetupError;

impl Display for SetupError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str("setup failed")
    }
}

impl std::error::Error for SetupError {}

pub struct Test1;

#[singleton]
impl Test1 {
    #[instance]
    pub fn new() -> Self {
        todo!()
    }
}

pub struct Test2;

#[singleton]
impl Test2 {
    #[instance]
    pub fn new() -> Test2 {
        todo!()
    }
}

pub struct Test3;

#[singleton]
impl Test3 {
    #[instance]
    pub fn new() -> Result<Self, SetupError> {
        todo!()
    }
}

pub struct Test4;

#[singleton]
impl Test4 {
    #[instance]
    pub fn new() -> Result<Test4, SetupError> {
        todo!()
    }
}

pub struct Test5;

#[singleton]
impl Test5 {
    #[instance]
    pub fn new() -> std::result::Result<Test5, SetupError> {
        todo!()
    }
}

pub struct Test6<T>(T);

#[singleton]
impl<T> Test6<T>
where
    T: Default + Send + Sync + 'static,
{
    #[instance]
    fn new() -> Self {
        Self(T::default())
    }
}

fn assert_singleton<T: Singleton>() {}

fn main() {
    assert_singleton::<Test1>();
    assert_singleton::<Test2>();
    assert_singleton::<Test3>();
    assert_singleton::<Test4>();
    assert_singleton::<Test5>();
    assert_singleton::<Test6<u8>>();
}
