use anypay::core::config::AnyPayConfig;
use anypay::core::traits::AccountApi;
use anypay::core::types::{Currency, SignType};
use anypay::{build_client, MerchantRedirect};
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

fn usage() {
    println!("Usage:");
    println!("  anypay balance");
    println!("  anypay rates");
    println!("  anypay redirect <pay_id> <amount> [currency] [md5|sha256]");
    println!();
    println!("Credentials are read from ANYPAY_API_ID, ANYPAY_API_KEY, ANYPAY_SECRET_KEY");
    println!("and ANYPAY_PROJECT_ID (a .env file in the working directory is honoured).");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first() else {
        usage();
        return Ok(());
    };

    let config = AnyPayConfig::from_env_file("ANYPAY")?;
    let client = build_client(config)?;

    match command.as_str() {
        "balance" => {
            let balance = client.get_balance().await?;
            println!("Balance: {:.2} RUB", balance.balance);
        }
        "rates" => {
            let rates = client.get_rates().await?;
            for (currency, rate) in &rates.incoming {
                println!("in  {}: {}", currency, rate);
            }
            for (currency, rate) in &rates.outgoing {
                println!("out {}: {}", currency, rate);
            }
        }
        "redirect" => {
            let (Some(pay_id), Some(amount)) = (args.get(1), args.get(2)) else {
                usage();
                return Ok(());
            };
            let currency = args.get(3).map_or(Ok(Currency::RUB), |c| c.parse::<Currency>())?;
            let sign_type = args.get(4).map_or(Ok(SignType::Md5), |s| s.parse::<SignType>())?;

            let redirect = MerchantRedirect::new(pay_id.parse()?, amount.parse::<Decimal>()?, currency)
                .with_sign_type(sign_type);
            println!("{}", client.build_merchant_redirect_url(&redirect)?);
        }
        _ => usage(),
    }

    Ok(())
}
