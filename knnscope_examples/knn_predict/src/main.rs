use knnscope::{
    EvalConfig, KeyMetric, composite_score,
    data::{IRIS_LABEL, load_iris},
    predict,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // Usage: knn_predict [K] [VALUE,VALUE;VALUE,VALUE;...] [prec|recall|none]
    let args: Vec<String> = std::env::args().collect();
    let k = args.get(1).map(|s| s.parse::<usize>()).transpose()?.unwrap_or(5);
    let queries: Vec<Vec<f64>> = match args.get(2) {
        Some(raw) => raw
            .split(';')
            .map(|row| {
                row.split(',').map(|v| v.trim().parse::<f64>()).collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?,
        None => vec![vec![1.4, 0.2], vec![4.5, 1.5], vec![6.0, 2.3]],
    };
    let key =
        args.get(3).map(|s| s.parse::<KeyMetric>()).transpose()?.unwrap_or(KeyMetric::Balanced);

    let table = load_iris()?;
    let features = ["petal_length", "petal_width"];

    let labels = predict(&table, &features, IRIS_LABEL, k, &queries)?;
    for (query, label) in queries.iter().zip(&labels) {
        println!("{:?} -> {}", query, label);
    }

    let score =
        composite_score(&table, &features, IRIS_LABEL, &EvalConfig::composite().with_k(k), key)?;
    println!("Composite score ({:?}): {:.4}", key, score);

    Ok(())
}
