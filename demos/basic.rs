//! Basic example replaying the host's side of the boundary.
//!
//! Run with: cargo run --example basic

use randcore::{Counter, RandomNumber};

extern "C" fn host_callback() -> i32 {
    println!("Host function called from the runtime!");
    42
}

fn main() -> randcore::Result<()> {
    println!("API Version: {}", randcore::api_version());
    println!(
        "Version compatible with 0.1: {}",
        randcore::api_version_compatible(0, 1)
    );

    // Handshake: register the reverse-call entry point and bring the
    // runtime up.
    randcore::init_with_callback(host_callback)?;
    println!("Initialized: {}", randcore::is_initialized());

    println!("\n--- Counter ---");
    let mut counter = Counter::new()?;
    println!("Initial value: {}", counter.value()?);
    for _ in 0..3 {
        println!("Counter value after increment: {}", counter.increment()?);
    }
    counter.close()?;

    println!("\n--- Seeded number ---");
    let number = RandomNumber::new(5)?;
    println!("Stored value: {}", number.value()?);
    println!("Derived value: {}", number.generate()?);
    println!("Stored value again: {}", number.value()?);

    println!("\n--- Notify ---");
    // Blocks until the runtime has invoked host_callback and returned.
    randcore::notify()?;

    Ok(())
}
