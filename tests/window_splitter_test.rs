//! Tests for sequence generation, windowing and splitting

use stateful_rnn::data::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scenario_single_sample_windows() {
        // input_len=10, tsteps=2, lahead=1, batch_size=1
        let generator = SequenceGenerator::new(0.1, 2, 1986).unwrap();
        let (sequence, average) = generator.generate(10).unwrap();

        assert_eq!(undefined_prefix(2, 1), 1);
        assert_eq!(average.defined_len(), 9);

        let split = WindowSplitter::new(1, 1)
            .unwrap()
            .with_ratio(0.8)
            .unwrap()
            .run(&sequence, &average)
            .unwrap();

        assert_eq!(split.train.len(), 7);
        assert_eq!(split.test.len(), 2);
        assert_eq!(split.train.targets().len(), 7);
        assert_eq!(split.test.targets().len(), 2);
    }

    #[test]
    fn test_scenario_two_sample_windows() {
        let generator = SequenceGenerator::new(0.1, 2, 7).unwrap();
        let (sequence, average) = generator.generate(12).unwrap();
        let x = sequence.values();

        let data = WindowSplitter::new(2, 1)
            .unwrap()
            .windows(&sequence, &average)
            .unwrap();

        assert_eq!(data.len(), 11);
        for row in 0..data.len() {
            let i = row + 1;
            assert_eq!(data.window(row).to_vec(), vec![x[i - 1], x[i]]);
            assert_eq!(data.target(row), average.get(i).unwrap());
        }
        // first row uses the true first sample, not a placeholder
        assert_eq!(data.window(0)[0], x[0]);
    }

    #[test]
    fn test_windows_reconstruct_sequence() {
        let generator = SequenceGenerator::new(1.0, 3, 11).unwrap();
        let (sequence, average) = generator.generate(40).unwrap();
        let x = sequence.values();

        for lahead in 2..8 {
            let data = WindowSplitter::new(lahead, 1)
                .unwrap()
                .windows(&sequence, &average)
                .unwrap();
            let to_drop = undefined_prefix(3, lahead);

            assert_eq!(data.len(), 40 - to_drop);
            assert_eq!(data.lahead(), lahead);

            for row in 0..data.len() {
                let end = row + to_drop;
                let window = data.window(row);
                for (k, &value) in window.iter().enumerate() {
                    // undo the shift: column k holds x[end - (lahead - 1 - k)]
                    assert_eq!(value, x[end + 1 + k - lahead]);
                }
            }
        }
    }

    #[test]
    fn test_targets_never_from_undefined_region() {
        let generator = SequenceGenerator::new(0.5, 6, 3).unwrap();
        let (sequence, average) = generator.generate(30).unwrap();

        for lahead in 1..10 {
            let data = WindowSplitter::new(lahead, 1)
                .unwrap()
                .windows(&sequence, &average)
                .unwrap();
            let to_drop = undefined_prefix(6, lahead);

            for row in 0..data.len() {
                assert_eq!(Some(data.target(row)), average.get(row + to_drop));
            }
        }
    }

    #[test]
    fn test_split_lengths_are_batch_multiples() {
        let generator = SequenceGenerator::new(0.1, 2, 1986).unwrap();
        let (sequence, average) = generator.generate(101).unwrap();

        for batch_size in 1..=16 {
            for ratio in [0.0, 0.1, 0.33, 0.5, 0.8, 0.95, 1.0] {
                let splitter = WindowSplitter::new(3, batch_size)
                    .unwrap()
                    .with_ratio(ratio)
                    .unwrap();
                let data = splitter.windows(&sequence, &average).unwrap();
                let split = splitter.split(&data);

                assert_eq!(split.train.len() % batch_size, 0);
                assert_eq!(split.test.len() % batch_size, 0);
                assert!(split.train.len() + split.test.len() <= data.len());
                assert!(data.len() - split.train.len() - split.test.len() < batch_size);
                assert!(split.train.len() as f64 <= data.len() as f64 * ratio);
            }
        }
    }

    #[test]
    fn test_test_portion_follows_train() {
        let generator = SequenceGenerator::new(0.1, 2, 5).unwrap();
        let (sequence, average) = generator.generate(50).unwrap();

        let splitter = WindowSplitter::new(2, 4).unwrap();
        let data = splitter.windows(&sequence, &average).unwrap();
        let split = splitter.split(&data);

        let n_train = split.train.len();
        assert_eq!(split.train.target(0), data.target(0));
        assert_eq!(split.test.target(0), data.target(n_train));
        assert_eq!(split.test.window(0), data.window(n_train));
    }

    #[test]
    fn test_generation_is_idempotent() {
        let a = SequenceGenerator::new(0.1, 4, 1986).unwrap().generate(200).unwrap();
        let b = SequenceGenerator::new(0.1, 4, 1986).unwrap().generate(200).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_moving_average_defined_values() {
        for tsteps in 1..=12 {
            let generator = SequenceGenerator::new(1.0, tsteps, 9).unwrap();
            let (_, average) = generator.generate(12).unwrap();
            assert_eq!(average.defined_len(), 12 - tsteps + 1);
            assert_eq!(average.len(), 12);
        }
    }
}
