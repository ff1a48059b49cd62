use knnscope::{
    EvalConfig,
    data::{IRIS_FEATURES, IRIS_LABEL, load_iris},
    tui::{DashboardRequest, run_dashboard},
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logging to stderr would tear the alternate screen, so only errors get through.
    env_logger::Builder::from_default_env().filter_level(log::LevelFilter::Error).init();

    // Usage: dashboard [K] [K_MAX]
    let args: Vec<String> = std::env::args().collect();
    let k = args.get(1).map(|s| s.parse::<usize>()).transpose()?.unwrap_or(6);
    let k_max = args.get(2).map(|s| s.parse::<usize>()).transpose()?.unwrap_or(10);

    let table = load_iris()?;
    let request = DashboardRequest {
        label: IRIS_LABEL.to_string(),
        features: IRIS_FEATURES.iter().map(|f| f.to_string()).collect(),
        config: EvalConfig::default().with_k(k),
        sweep_features: vec!["sepal_length".to_string(), "petal_length".to_string()],
        k_max,
        predict_features: vec!["petal_length".to_string(), "petal_width".to_string()],
        predict_k: k,
        queries: vec![vec![1.4, 0.2], vec![4.5, 1.5], vec![6.0, 2.3]],
    };

    let dashboard = run_dashboard(&table, &request)?;
    for (query, label) in dashboard.predictions() {
        println!("{:?} -> {}", query, label);
    }

    Ok(())
}
