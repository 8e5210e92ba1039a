use ffnet::prelude::*;

/// Console observer: prints accuracy every 200 epochs.
struct Progress;

impl TrainingObserver for Progress {
    fn on_epoch_end(&mut self, metric: &EpochMetric) {
        if metric.epoch % 200 != 0 {
            return;
        }
        match metric.evaluation {
            Some(eval) => println!(
                "epoch {:4}: {}/{} correct ({:.1}%)",
                metric.epoch,
                eval.correct,
                eval.total,
                eval.accuracy_percent()
            ),
            None => println!("epoch {:4}", metric.epoch),
        }
    }
}

fn main() -> Result<()> {
    // XOR with one-hot targets: class 0 = false, class 1 = true.
    let data = vec![
        Sample::new(array![0.0, 0.0], array![1.0, 0.0]),
        Sample::new(array![0.0, 1.0], array![0.0, 1.0]),
        Sample::new(array![1.0, 0.0], array![0.0, 1.0]),
        Sample::new(array![1.0, 1.0], array![1.0, 0.0]),
    ];

    let mut net = Network::new(&[2, 4, 2], Activation::Sigmoid, Some(42))?;
    let config = TrainingConfig {
        epochs: 2000,
        mini_batch_size: 4,
        learning_rate: 3.0,
        seed: Some(7),
    };

    let mut progress = Progress;
    let mut observers: Vec<&mut dyn TrainingObserver> = vec![&mut progress];
    let history = net.train_with_observers(&data, &config, Some(&data), &mut observers)?;

    let last = history.last().and_then(|m| m.evaluation);
    if let Some(eval) = last {
        println!(
            "\nfinal accuracy: {}/{} ({:.1}%)",
            eval.correct,
            eval.total,
            eval.accuracy_percent()
        );
    }

    for sample in &data {
        let out = net.predict(&sample.input)?;
        println!(
            "{} xor {} -> class {}",
            sample.input[0],
            sample.input[1],
            ffnet::utils::argmax(&out)
        );
    }

    net.save("xor.model")?;
    println!("\nsaved to xor.model");
    Ok(())
}
