//! Connect and read basic device state

use attrust::Device;

#[tokio::main]
async fn main() -> attrust::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .init();

    // Change to your device IP
    let ip = std::env::var("DEVICE_IP").unwrap_or_else(|_| "192.168.1.201".to_string());

    println!("Connecting to {}...", ip);

    let mut device = Device::new(ip, 5010);
    device.connect().await?;
    println!("✓ Connected!");

    let serial = device.get_serial_number().await?;
    println!("✓ Serial number: {}", serial);

    let clock = device.get_clock().await?;
    println!("✓ Device time: {}", clock);

    let counts = device.get_record_count().await?;
    println!("✓ Records: {} stored, {} unread", counts.total, counts.unread);

    device.disconnect().await?;
    println!("✓ Disconnected");

    Ok(())
}
