use std::time::{Duration, Instant};

use rayon::prelude::*;

use barcode_kit::{BarcodeFormat, BarcodeKit, EncodeRequest, ENCODERS};

const ITERATIONS: u32 = 50;

fn sample_contents(format: BarcodeFormat) -> &'static str {
    match format {
        BarcodeFormat::UPC_A => "012345678905",
        BarcodeFormat::EAN_8 => "96385074",
        BarcodeFormat::EAN_13 => "9310779300005",
        BarcodeFormat::CODE_39 => "BENCH-39",
        BarcodeFormat::ITF => "00123456789012",
        BarcodeFormat::CODABAR => "A40156B",
        BarcodeFormat::MSI => "1234567",
        BarcodeFormat::PLESSEY => "12AB",
        _ => "https://example.com/benchmark?id=42",
    }
}

fn mean(total: Duration) -> u128 {
    total.as_micros() / u128::from(ITERATIONS)
}

fn main() {
    println!("Running barcode-kit round trip benchmarks");
    println!("=========================================\n");
    println!("{:<14} {:>12} {:>12} {:>8}", "Format", "encode (us)", "decode (us)", "read");

    let kit = BarcodeKit::new();
    let total_start = Instant::now();

    for format in ENCODERS {
        let req = EncodeRequest::new(sample_contents(format), format);

        let mut encode_time = Duration::ZERO;
        let mut png = Vec::new();
        for _ in 0..ITERATIONS {
            let start = Instant::now();
            png = match kit.encode(&req) {
                Ok(png) => png,
                Err(e) => {
                    println!("{:<14} failed to encode: {e}", format.name());
                    break;
                }
            };
            encode_time += start.elapsed();
        }
        if png.is_empty() {
            continue;
        }

        let mut decode_time = Duration::ZERO;
        let mut read = 0;
        for _ in 0..ITERATIONS {
            let start = Instant::now();
            let res = kit.decode(&png, Some(format.name()), false, None);
            decode_time += start.elapsed();
            if matches!(res, Ok(Some(b)) if b.value == req.contents) {
                read += 1;
            }
        }

        println!(
            "{:<14} {:>12} {:>12} {:>5}/{}",
            format.name(),
            mean(encode_time),
            mean(decode_time),
            read,
            ITERATIONS
        );
    }

    // Same kit shared across threads
    let parallel_start = Instant::now();
    let read = (0..ITERATIONS * 4)
        .into_par_iter()
        .filter(|i| {
            let contents = format!("parallel-{i}");
            let req = EncodeRequest::new(contents.as_str(), BarcodeFormat::QR_CODE);
            let Ok(png) = kit.encode(&req) else { return false };
            let res = kit.decode(&png, Some("QR_CODE"), false, None);
            matches!(res, Ok(Some(b)) if b.value == contents)
        })
        .count();
    let elapsed = parallel_start.elapsed();
    println!("\nParallel QR round trips: {read}/{} in {elapsed:?}", ITERATIONS * 4);

    println!("Total time elapsed: {:?}", total_start.elapsed());
}
