//! Demo driver: fill and print the containers.
//!
//! Builds an ordered factorial table, then fills a `GrowVec` with 0..10
//! once through the system strategy and once through a counting strategy,
//! printing emptiness before and after and the traversal order.

use vessel::{AllocStrategy, CountingStrategy, GrowVec, SeqError, SystemStrategy};
use vessel_bench::factorials;

fn show<S: AllocStrategy>(label: &str, strategy: S) -> Result<GrowVec<i32, S>, SeqError> {
    println!("{label}:");
    let mut v = GrowVec::new_in(strategy)?;
    println!("  empty {}", v.is_empty());
    for i in 0..10 {
        v.push(i)?;
    }
    println!("  empty {}", v.is_empty());
    let items: Vec<String> = v.begin().map(|x| x.to_string()).collect();
    println!("  {}", items.join(" "));
    Ok(v)
}

fn main() -> Result<(), SeqError> {
    println!("factorial table for keys 0..9:");
    let table: Vec<String> = factorials(10)
        .iter()
        .map(|(k, v)| format!("{{{k}, {v}}}"))
        .collect();
    println!("  {}\n", table.join(" "));

    show("GrowVec<i32> with the system strategy", SystemStrategy::new())?;

    let counting = CountingStrategy::new();
    show("GrowVec<i32> with a counting strategy", counting.clone())?;
    println!("  strategy calls: {:?}", counting.stats());

    Ok(())
}
