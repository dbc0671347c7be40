use std::thread;

#[ordo::serial]
fn log_line(line: String) {
    println!("[{}] {}", thread::current().name().unwrap_or("?"), line);
}

#[ordo::serial]
fn simple_computation(x: i32) -> i32 {
    x * x
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Testing the #[ordo::serial] attribute");

    for i in 0..3 {
        log_line(format!("message {}", i))?;
    }

    let handle = simple_computation(7)?;
    println!("handle: {:?}", handle);
    println!("7² = {}", handle.wait()?);

    ordo::runtime::shutdown(true);
    ordo::runtime::get_or_init().join();

    Ok(())
}
