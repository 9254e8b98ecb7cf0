mod engine {
    pub use locator as services;
}

use engine::services::prelude::*;

pub struct Timer {
    ticks: u64,
}

#[singleton(crate = engine::services)]
impl Timer {
    #[instance]
    fn start() -> Self {
        Self { ticks: 0 }
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

fn main() {
    let mut registry = Registry::new();
    registry.register::<Timer>().unwrap();
    assert_eq!(registry.get::<Timer>().unwrap().ticks(), 0);
}
