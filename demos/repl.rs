use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt};
use lispy::{Config, EvaluationContext};

async fn query(stdout: &mut io::Stdout, lines: &mut io::Lines<io::BufReader<io::Stdin>>, prompt: &str) -> io::Result<Option<String>> {
    stdout.write_all(prompt.as_bytes()).await?;
    stdout.flush().await?;
    lines.next_line().await
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    let mut context = EvaluationContext::new();
    let mut lines = io::BufReader::new(io::stdin()).lines();
    let mut stdout = io::stdout();

    for line in &config.banner {
        println!("{}", line);
    }

    while let Some(line) = query(&mut stdout, &mut lines, &config.prompt).await? {
        match context.evaluate_str(&line) {
            Ok(value) => println!("{}", value),
            Err(err) => println!("{}", err),
        }
    }

    Ok(())
}
