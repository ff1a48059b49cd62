use knnscope::{
    EvalConfig,
    data::{CsvHeadersLoader, IRIS_LABEL, load_data, load_iris},
    sweep_k,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // Usage: k_sweep [CSV|iris] [K_MAX] [FEATURE,FEATURE,...] [LABEL] [--legacy]
    let args: Vec<String> = std::env::args().collect();
    let source = args.get(1).map(String::as_str).unwrap_or("iris");
    let k_max = args.get(2).map(|s| s.parse::<usize>()).transpose()?.unwrap_or(10);
    let features: Vec<String> = args
        .get(3)
        .map(|s| s.split(',').map(str::to_string).collect())
        .unwrap_or_else(|| vec!["sepal_length".to_string(), "petal_length".to_string()]);
    let label = args.get(4).map(String::as_str).unwrap_or(IRIS_LABEL);
    let legacy = args.iter().any(|a| a == "--legacy");

    let table = match source {
        "iris" => load_iris()?,
        path => load_data::<CsvHeadersLoader, _>(path)?,
    };

    let config = EvalConfig::default().with_standardize(!legacy);
    let results = sweep_k(&table, &features, label, k_max, &config)?;

    println!("{:>3} {:>14} {:>13}", "k", "train_accuracy", "test_accuracy");
    for row in &results {
        println!("{:>3} {:>14.4} {:>13.4}", row.k, row.train_accuracy, row.test_accuracy);
    }

    Ok(())
}
