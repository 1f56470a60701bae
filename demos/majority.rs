use std::collections::HashMap;

use robdd::{Bdd, Expr, VarSpec};

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    simplelog::TermLogger::init(
        simplelog::LevelFilter::Debug,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let bdd = Bdd::default();
    println!("bdd = {:?}", bdd);

    let a = bdd.var("a")?;
    let b = bdd.var("b")?;
    let c = bdd.var("c")?;
    println!("a = {}, b = {}, c = {}", a, b, c);

    // Majority of three, once through combinators...
    let maj = bdd.or(&bdd.or(&bdd.and(&a, &b), &bdd.and(&a, &c)), &bdd.and(&b, &c));
    println!("maj = {}, {} nodes", maj, bdd.size(&maj));

    // ...and once through an expression tree. Same handle either way.
    let ea = Expr::var(VarSpec::simple("a")?);
    let eb = Expr::var(VarSpec::simple("b")?);
    let ec = Expr::var(VarSpec::simple("c")?);
    let expr = (ea.clone() & eb.clone()) | (ea & ec.clone()) | (eb & ec);
    let maj2 = bdd.from_expr(&expr);
    assert_eq!(maj, maj2);

    for (name, id) in [("a", 1), ("b", 2), ("c", 3)] {
        let spec = bdd.spec_of(robdd::VarId::new(id));
        println!("{} registered as {}", name, spec);
    }

    let point = HashMap::from([
        (robdd::VarId::new(1), true),
        (robdd::VarId::new(2), false),
        (robdd::VarId::new(3), true),
    ]);
    println!("maj(1, 0, 1) = {}", bdd.eval(&maj, &point)?);

    let (hits, misses) = bdd.ite_cache_stats();
    println!("ite cache: {} hits, {} misses", hits, misses);

    println!("{}", bdd.to_dot(&maj));

    drop(maj2);
    bdd.collect_garbage();
    println!("after gc: {:?}", bdd);

    Ok(())
}
