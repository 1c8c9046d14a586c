//! A small calculator CLI wired through signpost.
//!
//! Demonstrates the registration surface end to end: nested paths, aliases,
//! a caller-defined argument type, flags, defaults, and named arguments.
//!
//! ```text
//! calc math fma 10 12.3 30.5013
//! calc math double 500
//! calc temp to-celsius 98.6
//! calc greet -name world
//! ```

use anyhow::Result;
use signpost::Dispatcher;

/// A temperature read from the command line as degrees Fahrenheit.
struct Fahrenheit(f64);

fn fma(x: i32, y: f32, z: f64) {
    println!("{}", f64::from(x) + f64::from(y) * z);
}

fn double(x: i32) {
    println!("{}", x * 2);
}

fn to_celsius(f: Fahrenheit) {
    println!("{:.1}", (f.0 - 32.0) * 5.0 / 9.0);
}

fn greet(greeting: String, name: String) {
    println!("{}, {}!", greeting, name);
}

fn build_dispatcher() -> Result<Dispatcher> {
    let mut dispatcher = Dispatcher::new();

    dispatcher.add_command(&["math", "fma"], fma)?;
    dispatcher.add_alias(&["math", "fma"], "muladd")?;
    dispatcher.add_command(&["math", "double"], double)?;

    // Conversions for caller-defined types go in before the commands that
    // use them.
    dispatcher.add_conversion(|token: &str| token.parse::<f64>().map(Fahrenheit));
    dispatcher.add_command(&["temp", "to-celsius"], to_celsius)?;
    dispatcher.add_alias(&["temp", "to-celsius"], "c")?;

    dispatcher.add_command(&["greet"], greet)?;
    dispatcher.add_default(&["greet"], 0, "hello")?;
    dispatcher.add_positional_flag(&["greet"], 1, "name")?;
    dispatcher.add_value_flag(&["greet"], 0, "shout", "HEY")?;
    dispatcher.set_arg_name(&["greet"], 0, "greeting")?;
    dispatcher.set_arg_name(&["greet"], 1, "name")?;

    Ok(dispatcher)
}

fn main() -> Result<()> {
    let mut dispatcher = build_dispatcher()?;
    dispatcher.execute_command(std::env::args());
    Ok(())
}
