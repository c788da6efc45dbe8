use std::io;

use lispy::{Config, Editor, Repl};
use log::info;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = Config::from_env()?;
    info!("starting with {:?}", config);

    let mut editor = Editor::new()?;
    editor.load_history(&config);

    let mut repl = Repl::new(editor, io::stdout(), config.clone());
    repl.run()?;

    repl.source_mut().save_history(&config)
}
