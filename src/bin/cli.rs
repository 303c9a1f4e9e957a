use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use pokequiz_engine::{AnswerOutcome, GameStart, Item, ScoreRecord};

#[derive(Parser)]
#[command(name = "pokequiz-cli")]
#[command(about = "PokeQuiz terminal client", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Quiz server base URL
    #[arg(short, long, default_value = "http://127.0.0.1:3000")]
    server: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a game
    Play {
        /// Player name (letters only, at most 15)
        name: String,
    },

    /// Show the leaderboard
    Scores {
        /// Number of entries
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },

    /// Check that the server is up
    Health,
}

#[derive(Debug, Deserialize)]
struct ServerError {
    error: String,
}

/// Thin proxy over the quiz HTTP API
struct QuizClient {
    client: Client,
    base_url: String,
}

/// Server replied with an error body
#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.status)
    }
}

impl std::error::Error for ApiError {}

impl QuizClient {
    fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> anyhow::Result<T> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let message = match response.json::<ServerError>().await {
            Ok(body) => body.error,
            Err(_) => "unexpected server response".to_string(),
        };
        Err(ApiError { status, message }.into())
    }

    async fn post<T: DeserializeOwned>(&self, path: &str, body: serde_json::Value) -> anyhow::Result<T> {
        let response = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .json(&body)
            .send()
            .await
            .with_context(|| format!("cannot reach {}", self.base_url))?;
        Self::decode(response).await
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> anyhow::Result<T> {
        let response = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await
            .with_context(|| format!("cannot reach {}", self.base_url))?;
        Self::decode(response).await
    }

    async fn start(&self, name: &str) -> anyhow::Result<GameStart> {
        self.post("/game/start", json!({ "playerName": name })).await
    }

    async fn answer(&self, game: &GameStart, item: &Item, answer: &str) -> anyhow::Result<AnswerOutcome> {
        self.post(
            "/game/answer",
            json!({
                "session": {
                    "playerName": game.player_name,
                    "score": game.score,
                    "lives": game.lives,
                },
                "currentItem": item,
                "playerAnswer": answer,
            }),
        )
        .await
    }

    async fn next(&self, previous: &Item) -> anyhow::Result<Item> {
        self.post("/game/next", json!({ "previousItem": previous })).await
    }

    async fn scores(&self, limit: usize) -> anyhow::Result<Vec<ScoreRecord>> {
        self.get(&format!("/game/scores?limit={}", limit)).await
    }

    async fn health(&self) -> anyhow::Result<serde_json::Value> {
        self.get("/health").await
    }
}

async fn prompt(lines: &mut tokio::io::Lines<BufReader<tokio::io::Stdin>>) -> anyhow::Result<Option<String>> {
    let mut stdout = tokio::io::stdout();
    stdout.write_all(b"> ").await?;
    stdout.flush().await?;
    Ok(lines.next_line().await?)
}

async fn play(client: &QuizClient, name: &str) -> anyhow::Result<()> {
    let mut game = client.start(name).await?;
    let mut item = game.current_item.clone();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("🎮 Game on, {}! Type the creature's name, or \"skip\" for another picture.", game.player_name);

    loop {
        println!("\n❤️  {}   ⭐ {}", game.lives, game.score);
        println!("🖼️  Who's that? {}", item.image_url());

        let Some(answer) = prompt(&mut lines).await? else {
            println!("👋 Bye!");
            return Ok(());
        };

        if answer.trim().eq_ignore_ascii_case("skip") {
            item = client.next(&item).await?;
            continue;
        }

        let outcome = client.answer(&game, &item, &answer).await?;
        match &outcome.correct_answer {
            None => println!("✅ Correct!"),
            Some(expected) => println!("❌ Nope, it was {}", expected),
        }

        game.score = outcome.score;
        game.lives = outcome.lives;

        match outcome.current_item {
            Some(next) if !outcome.is_over => item = next,
            _ => {
                println!("\n🏁 Game over! Final score: {}", outcome.score);
                return Ok(());
            }
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let client = QuizClient::new(&cli.server);

    match cli.command {
        Commands::Play { name } => play(&client, &name).await?,

        Commands::Scores { limit } => match client.scores(limit).await {
            Ok(scores) => {
                println!("🏆 Leaderboard:");
                for (i, record) in scores.iter().enumerate() {
                    println!("   {:>2}. {:<15} {}", i + 1, record.name, record.score);
                }
            }
            Err(e) => match e.downcast_ref::<ApiError>() {
                Some(api) if api.status == StatusCode::NOT_FOUND => println!("📭 No scores yet"),
                _ => return Err(e),
            },
        },

        Commands::Health => {
            let health = client.health().await?;
            if health["status"] != "ok" {
                bail!("server unhealthy: {}", health);
            }
            println!("✅ {} (v{})", health["message"].as_str().unwrap_or("ok"), health["version"].as_str().unwrap_or("?"));
        }
    }

    Ok(())
}
