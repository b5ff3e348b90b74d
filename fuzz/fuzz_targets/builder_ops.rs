#![no_main]

use chunkstr::{BuilderConfig, Utf8Builder};
use libfuzzer_sys::fuzz_target;

// Interprets the input as a little program of builder operations and checks
// the builder against a plain Vec<u8> after every step.
fuzz_target!(|data: &[u8]| {
    let Some((&capacity, mut ops)) = data.split_first() else {
        return;
    };
    let config = BuilderConfig::default().with_chunk_capacity(usize::from(capacity % 64) + 1);
    let builder = Utf8Builder::new(config);
    let mut model: Vec<u8> = Vec::new();

    while let [op, a, b, rest @ ..] = ops {
        let (a, b) = (usize::from(*a), usize::from(*b));
        match op % 5 {
            // Append up to `b` bytes of the remaining input
            0 => {
                let n = b.min(rest.len());
                builder.append(&rest[..n]);
                model.extend_from_slice(&rest[..n]);
            }
            // Insert, possibly out of range
            1 => {
                let n = b.min(rest.len());
                let at = a * model.len().max(1) / 255;
                let result = builder.insert(at, &rest[..n]);
                assert_eq!(result.is_ok(), at <= model.len());
                if result.is_ok() {
                    let tail = model.split_off(at);
                    model.extend_from_slice(&rest[..n]);
                    model.extend(tail);
                }
            }
            // Remove, possibly out of range
            2 => {
                let start = a * model.len() / 255;
                let result = builder.remove(start, b);
                assert_eq!(result.is_ok(), start + b <= model.len());
                if result.is_ok() {
                    model.drain(start..start + b);
                }
            }
            // Scalar append
            3 => {
                let value = (a as i64 - 128) * (b as i64 + 1) * 1_000_003;
                builder.append(value);
                model.extend_from_slice(value.to_string().as_bytes());
            }
            // Range copy
            _ => {
                let start = a.min(model.len());
                let len = b.min(model.len() - start);
                let mut dst = vec![0u8; len];
                builder.copy_range_to(start, &mut dst).unwrap();
                assert_eq!(dst, &model[start..start + len]);
            }
        }
        assert_eq!(builder.len(), model.len());
        ops = rest;
    }

    assert_eq!(builder.to_vec(), model);
    let lengths = builder.chunk_lengths();
    assert_eq!(lengths.iter().sum::<usize>(), model.len());
});
