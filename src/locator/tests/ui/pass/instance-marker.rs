use std::sync::Arc;

use locator::prelude::*;

pub struct Clock {
    hz: u32,
}

#[singleton]
impl Clock {
    #[instance()]
    fn new() -> Self {
        Self { hz: 60 }
    }
}

fn main() {
    let mut registry = Registry::new();
    registry.register::<Clock>().unwrap();
    let clock: Arc<Clock> = registry.get().unwrap();
    assert_eq!(clock.hz, 60);
}
