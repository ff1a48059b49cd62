use knnscope::{
    Average, EvalConfig, LogProgress,
    data::{IRIS_FEATURES, IRIS_LABEL, UCI_IRIS_URL, fetch_iris},
    score_features,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // Usage: feature_scores [URL] [K] [AVERAGE]
    let args: Vec<String> = std::env::args().collect();
    let url = args.get(1).cloned().unwrap_or_else(|| UCI_IRIS_URL.to_string());
    let k = args.get(2).map(|s| s.parse::<usize>()).transpose()?.unwrap_or(6);
    let average =
        args.get(3).map(|s| s.parse::<Average>()).transpose()?.unwrap_or(Average::Weighted);

    // reqwest's blocking client must stay off the async runtime threads
    let table = tokio::task::spawn_blocking(move || fetch_iris(&url)).await??;

    let config = EvalConfig::default().with_k(k).with_average(average);
    let scores = score_features(&table, &IRIS_FEATURES, IRIS_LABEL, &config, &mut LogProgress)?;

    println!("{:<14} {:>8} {:>9} {:>9} {:>9}", "feature", "accuracy", "precision", "recall", "f1");
    for score in &scores {
        println!(
            "{:<14} {:>8.2} {:>9.4} {:>9.4} {:>9.4}",
            score.feature, score.accuracy, score.precision, score.recall, score.f1
        );
    }

    Ok(())
}
