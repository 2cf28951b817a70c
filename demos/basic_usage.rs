use dotenvy::dotenv;
use mandrill_client::MandrillClient;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    let api_key = std::env::var("MANDRILL_API_KEY").expect("MANDRILL_API_KEY must be set");

    let client = MandrillClient::new();

    let pong = client.ping(&api_key).await?;
    println!("Ping: {pong}");

    let user = client.user_info(&api_key).await?;
    println!(
        "User: {} (created {}, reputation {}, hourly quota {})",
        user.username, user.created_at, user.reputation, user.hourly_quota
    );
    println!(
        "Sent today: {}, all time: {}",
        user.stats.today.sent, user.stats.all_time.sent
    );

    for sender in client.senders(&api_key).await? {
        println!("Sender {}: {} sent, {} opens", sender.address, sender.sent, sender.opens);
    }

    Ok(())
}
