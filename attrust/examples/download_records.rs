//! Attendance download example

use attrust::Device;

#[tokio::main]
async fn main() -> attrust::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let ip = std::env::var("DEVICE_IP").unwrap_or_else(|_| "192.168.1.201".to_string());

    let mut device = Device::new(ip, 5010);
    device.connect().await?;

    println!("Downloading new attendance records...");
    let records = device.download_new_records().await?;

    println!("{} record(s):", records.len());
    for record in &records {
        println!("  {}", record);
    }

    device.disconnect().await?;

    Ok(())
}
