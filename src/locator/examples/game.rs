use std::error::Error;
use std::sync::Arc;

use locator::global;
use locator::prelude::*;
use parking_lot::Mutex;

fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let configuration = Configuration::new()
        .with(CoreModule::new("locator-demo"))
        .with(GameplayModule);
    global::install(Registry::init(configuration)?)?;

    let game = global::get::<Game>()?;
    game.run();
    game.run();
    Ok(())
}

struct GameName(&'static str);

struct CoreModule {
    name: &'static str,
}

impl CoreModule {
    fn new(name: &'static str) -> Self {
        Self { name }
    }
}

impl Module for CoreModule {
    fn configure(&self, configurer: &mut Configurer) -> Result<(), Box<dyn Error + Send + Sync>> {
        configurer
            .register_instance(GameName(self.name))
            .register::<ConsoleLog>();
        Ok(())
    }
}

struct GameplayModule;

impl Module for GameplayModule {
    fn configure(&self, configurer: &mut Configurer) -> Result<(), Box<dyn Error + Send + Sync>> {
        configurer.register::<ScoreKeeper>().try_register_with(|| {
            Ok::<_, global::GlobalError>(Game {
                log: global::get()?,
                scores: global::get()?,
            })
        });
        Ok(())
    }
}

struct ConsoleLog {
    prefix: String,
}

#[singleton]
impl ConsoleLog {
    #[instance]
    fn new() -> Result<Self, global::GlobalError> {
        let name = global::get::<GameName>()?;
        Ok(Self {
            prefix: format!("[{}]", name.0),
        })
    }

    fn log(&self, message: &str) {
        eprintln!("{} {}", self.prefix, message);
    }
}

struct ScoreKeeper {
    score: Mutex<u32>,
}

#[singleton]
impl ScoreKeeper {
    #[instance]
    fn new() -> Self {
        Self {
            score: Mutex::new(0),
        }
    }

    fn add(&self, points: u32) -> u32 {
        let mut score = self.score.lock();
        *score += points;
        *score
    }
}

struct Game {
    log: Arc<ConsoleLog>,
    scores: Arc<ScoreKeeper>,
}

impl Game {
    fn run(&self) {
        let score = self.scores.add(10);
        self.log.log(&format!("round finished, score is {score}"));
    }
}
