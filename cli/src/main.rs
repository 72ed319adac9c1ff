use clap::{Args, Parser, Subcommand};
use ledger::{Transaction, TransactionKind};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "stockfolio-cli")]
#[command(about = "Stockfolio CLI - Command line client for the portfolio service")]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    server: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record a single purchase
    Buy(TradeArgs),
    /// Record a single sale, prints realized profit
    Sell(TradeArgs),
    /// Submit a JSON array of transactions as one batch
    Submit {
        #[arg(short, long)]
        file: PathBuf,
    },
    Balance,
    Lots,
    History,
    Health,
}

#[derive(Args)]
struct TradeArgs {
    #[arg(short = 's', long)]
    stock: String,
    #[arg(short = 'p', long)]
    price: Decimal,
    #[arg(short = 'q', long)]
    quantity: i64,
}

impl TradeArgs {
    fn into_transaction(self, kind: TransactionKind) -> Transaction {
        Transaction {
            kind,
            stock_id: self.stock,
            price: self.price,
            quantity: self.quantity,
        }
    }
}

#[derive(Serialize)]
struct SubmitTransactionsRequest {
    transactions: Vec<Transaction>,
}

#[derive(Deserialize)]
struct SubmitTransactionsResponse {
    profit: Decimal,
    applied: usize,
}

#[derive(Deserialize)]
struct HistoryResponse {
    transactions: Vec<Transaction>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Position {
    stock_id: String,
    open_quantity: i64,
    lots: Vec<LotLine>,
}

#[derive(Deserialize)]
struct LotLine {
    quantity: i64,
    price: Decimal,
}

async fn submit(
    client: &reqwest::Client,
    server: &str,
    transactions: Vec<Transaction>,
) -> Result<(), Box<dyn std::error::Error>> {
    let request = SubmitTransactionsRequest { transactions };

    let response = client
        .post(&format!("{}/transactions", server))
        .json(&request)
        .send()
        .await?;

    if response.status().is_success() {
        let result: SubmitTransactionsResponse = response.json().await?;
        println!("Applied: {}", result.applied);
        println!("Realized profit: {}", result.profit);
    } else {
        println!("Error: {}", response.status());
        println!("{}", response.text().await?);
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Buy(args) => {
            let tx = args.into_transaction(TransactionKind::Buy);
            submit(&client, &cli.server, vec![tx]).await?;
        }

        Commands::Sell(args) => {
            let tx = args.into_transaction(TransactionKind::Sell);
            submit(&client, &cli.server, vec![tx]).await?;
        }

        Commands::Submit { file } => {
            let raw = std::fs::read_to_string(&file)?;
            let transactions: Vec<Transaction> = serde_json::from_str(&raw)?;
            submit(&client, &cli.server, transactions).await?;
        }

        Commands::Balance => {
            let response = client
                .get(&format!("{}/balance", cli.server))
                .send()
                .await?;

            if response.status().is_success() {
                let balances: BTreeMap<String, i64> = response.json().await?;
                if balances.is_empty() {
                    println!("No holdings");
                }
                for (stock, quantity) in balances {
                    println!("{}: {}", stock, quantity);
                }
            } else {
                println!("Error: {}", response.status());
            }
        }

        Commands::Lots => {
            let response = client
                .get(&format!("{}/lots", cli.server))
                .send()
                .await?;

            if response.status().is_success() {
                let positions: Vec<Position> = response.json().await?;
                for position in positions {
                    println!("{} ({} open)", position.stock_id, position.open_quantity);
                    for (i, lot) in position.lots.iter().enumerate() {
                        println!("  {}: {} @ {}", i + 1, lot.quantity, lot.price);
                    }
                }
            } else {
                println!("Error: {}", response.status());
            }
        }

        Commands::History => {
            let response = client
                .get(&format!("{}/transactions", cli.server))
                .send()
                .await?;

            if response.status().is_success() {
                let history: HistoryResponse = response.json().await?;
                for (i, tx) in history.transactions.iter().enumerate() {
                    println!(
                        "{:>5}  {:<4} {:<8} {} @ {}",
                        i + 1,
                        tx.kind.as_str(),
                        tx.stock_id,
                        tx.quantity,
                        tx.price
                    );
                }
            } else {
                println!("Error: {}", response.status());
            }
        }

        Commands::Health => {
            let response = client
                .get(&format!("{}/health", cli.server))
                .send()
                .await?;

            if response.status().is_success() {
                let health: serde_json::Value = response.json().await?;
                println!("{}", serde_json::to_string_pretty(&health)?);
            } else {
                println!("Error: {}", response.status());
            }
        }
    }

    Ok(())
}
