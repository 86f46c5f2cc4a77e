use super::SeedArgs;
use crate::config::{CountsConfig, SeedConfig};
use crate::seed::Seeder;
use crate::store::Store;

pub fn run(args: SeedArgs) -> anyhow::Result<()> {
    let config = SeedConfig::builder()
        .config_file(args.config)
        .database(args.database)
        .profile(args.profile)
        .counts(CountsConfig {
            customers: args.customers,
            products: args.products,
            cashiers: args.cashiers,
            payment_methods: args.payment_methods,
            delivery_statuses: args.delivery_statuses,
            sales: args.sales,
        })
        .seed(args.seed)
        .locale(args.locale)
        .dry_run(args.dry_run)
        .progress(args.progress && !args.json)
        .build()?;

    tracing::info!(
        "profile {} against {}",
        config.profile,
        config.database.display()
    );

    let mut store = Store::open(&config.database)?;
    let report = Seeder::run(&mut store, &config.plan)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report);
    }
    Ok(())
}
