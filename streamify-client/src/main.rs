use std::{
    io::{self, BufRead},
    sync::Arc,
    thread,
};

use env_logger::{Builder, Env};
use streamify_client::{
    cli, data::Config, task::worker_pool, view, Command, Delegate, EngineFactory, Event,
};
use streamify_core::{
    player::{PlaybackEngine, ProcessEngine},
    session::SessionStore,
    webapi::{ApiRoot, WebApi},
};

const ENV_LOG: &str = "STREAMIFY_LOG";
const ENV_LOG_STYLE: &str = "STREAMIFY_LOG_STYLE";

fn main() {
    // Setup logging from the env variables, with defaults.
    Builder::from_env(
        Env::new()
            .filter_or(ENV_LOG, "info")
            .write_style(ENV_LOG_STYLE),
    )
    .init();

    // Load configuration
    let config = Config::load().unwrap_or_default();

    let root = match ApiRoot::new(&config.base_url) {
        Ok(root) => root,
        Err(err) => {
            log::error!("invalid base URL {:?}: {}", config.base_url, err);
            return;
        }
    };

    let session = match Config::session_path() {
        Some(path) => SessionStore::new(path),
        None => {
            log::warn!("no config directory, the session will not be persisted");
            SessionStore::in_memory()
        }
    };
    if let Err(err) = session.load() {
        log::error!("failed to load persisted session: {}", err);
    }

    let backend = Arc::new(WebApi::new(root, Config::proxy().as_deref()));
    let player_command = config.player_command.clone();
    let engines: EngineFactory = Box::new(move || -> Box<dyn PlaybackEngine> {
        Box::new(ProcessEngine::new(player_command.clone()))
    });
    let pool = worker_pool(config.worker_threads);

    let mut delegate = match Delegate::new(config, backend, session, Box::new(pool), engines) {
        Ok(delegate) => delegate,
        Err(err) => {
            log::error!("failed to start: {}", err);
            return;
        }
    };

    let _input_thread = thread::spawn({
        let sender = delegate.sender();
        move || {
            for line in io::stdin().lock().lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(err) => {
                        log::error!("failed to read input: {}", err);
                        break;
                    }
                };
                match cli::parse(&line) {
                    Ok(Some(cmd)) => {
                        if sender.send(Event::Command(cmd)).is_err() {
                            break;
                        }
                    }
                    Ok(None) => {}
                    Err(usage) => println!("{usage}"),
                }
            }
            let _ = sender.send(Event::Command(Command::Quit));
        }
    });

    println!("{}", cli::HELP);
    delegate.start();
    delegate.run(|state| print!("{}", view::render(state)));
}
