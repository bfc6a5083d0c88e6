#![allow(clippy::arithmetic_side_effects)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::indexing_slicing)]

//! Measures probe lengths of `HashTable` across load factors, for both deletion modes, and
//! plots the results to `probe_lengths.png` and `lost_keys.png`.

use plotters::prelude::*;
use primehash::{CountingMode, DeletionMode, HashTable, TableConfig};
use rand::{
    Rng,
    distr::{Alphanumeric, SampleString},
};

/// Prime bucket count used for every measurement
const TABLE_SIZE: usize = 1009;
/// Fill levels to measure, in percent of `TABLE_SIZE`
const LOAD_PERCENTS: [usize; 9] = [10, 20, 30, 40, 50, 60, 70, 80, 90];
/// Share of the inserted keys deleted before measuring, in percent
const DELETE_PERCENT: usize = 25;
/// Length of the random keys
const KEY_LEN: usize = 12;

/// Deletion modes to compare, with their chart labels and colours
const MODES: [(DeletionMode, &str, RGBColor); 2] = [
    (DeletionMode::EmptySlot, "Empty-slot deletion", RGBColor(220, 50, 50)),
    (DeletionMode::Tombstone, "Tombstone deletion", RGBColor(50, 90, 220)),
];

/// Probe statistics of one table at one load factor
#[derive(Debug, Clone, Copy, Default)]
struct Sample {
    /// Load factor before deletions, in percent
    load: usize,
    /// Mean probe length over the keys still expected to be present
    average_probes: f64,
    /// Longest probe length over the keys still expected to be present
    worst_probes: usize,
    /// Keys that should be present but that `search` reports as missing
    lost_keys: usize,
}

/// Generates `count` random alphanumeric keys
fn random_keys(rng: &mut impl Rng, count: usize) -> Vec<String> {
    (0..count).map(|_| Alphanumeric.sample_string(rng, KEY_LEN)).collect()
}

/// Fills a table to `load` percent, deletes a share of the keys and probes the survivors
fn measure(
    deletion: DeletionMode,
    keys: &[String],
    load: usize,
) -> Result<Sample, primehash::TableError> {
    let config = TableConfig::default()
        .with_base_size(TABLE_SIZE)
        .with_thresholds(95, 0)
        .with_deletion(deletion)
        .with_counting(CountingMode::DistinctKeys);
    let mut table = HashTable::with_config(config)?;

    let inserted = &keys[..TABLE_SIZE * load / 100];
    for key in inserted {
        table.try_insert(key, key)?;
    }

    let deleted = inserted.len() * DELETE_PERCENT / 100;
    for key in &inserted[..deleted] {
        table.try_delete(key)?;
    }

    let survivors = &inserted[deleted..];
    let probes: Vec<usize> = survivors.iter().map(|key| table.probe_length(key)).collect();
    let lost_keys = survivors.iter().filter(|key| table.search(key).is_none()).count();

    Ok(Sample {
        load,
        average_probes: probes.iter().sum::<usize>() as f64 / probes.len().max(1) as f64,
        worst_probes: probes.iter().copied().max().unwrap_or(0),
        lost_keys,
    })
}

/// Draws one line per deletion mode of `value` against the load factor
fn plot<F>(
    path: &str,
    caption: &str,
    y_desc: &str,
    results: &[Vec<Sample>],
    value: F,
) -> Result<(), Box<dyn std::error::Error>>
where
    F: Fn(&Sample) -> f64,
{
    let root = BitMapBackend::new(path, (1200, 800)).into_drawing_area();
    root.fill(&WHITE)?;

    let max_y = results
        .iter()
        .flat_map(|samples| samples.iter().map(&value))
        .fold(1.0, f64::max) *
        1.1; // Add 10% margin

    let mut chart = ChartBuilder::on(&root)
        .caption(caption, ("sans-serif", 35))
        .margin(15)
        .x_label_area_size(60)
        .y_label_area_size(60)
        .build_cartesian_2d(0_usize..100_usize, 0.0..max_y)?;

    chart
        .configure_mesh()
        .x_desc("Load Factor Before Deletions (%)")
        .y_desc(y_desc)
        .axis_desc_style(("sans-serif", 16))
        .draw()?;

    for ((_, label, color), samples) in MODES.iter().zip(results) {
        let line_style = ShapeStyle::from(color).stroke_width(2);
        chart
            .draw_series(LineSeries::new(
                samples.iter().map(|sample| (sample.load, value(sample))),
                line_style,
            ))?
            .label(*label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], line_style));

        chart.draw_series(
            samples
                .iter()
                .map(|sample| Circle::new((sample.load, value(sample)), 4, color.filled())),
        )?;
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .position(SeriesLabelPosition::UpperLeft)
        .draw()?;

    root.present()?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut rng = rand::rng();
    let keys = random_keys(&mut rng, TABLE_SIZE);

    let mut results: Vec<Vec<Sample>> = Vec::with_capacity(MODES.len());
    for (deletion, label, _) in MODES {
        println!("{label}");
        let mut samples = Vec::with_capacity(LOAD_PERCENTS.len());
        for load in LOAD_PERCENTS {
            let sample = measure(deletion, &keys, load)?;
            println!(
                "  load {:>2}%: avg probes = {:.2}, worst = {}, lost keys = {}",
                sample.load, sample.average_probes, sample.worst_probes, sample.lost_keys
            );
            samples.push(sample);
        }
        results.push(samples);
    }

    plot(
        "probe_lengths.png",
        "Average Probe Length After Deleting 25% of Keys",
        "Average Probes per Search",
        &results,
        |sample| sample.average_probes,
    )?;
    plot(
        "lost_keys.png",
        "Stored Keys Missed by Search",
        "Lost Keys",
        &results,
        |sample| sample.lost_keys as f64,
    )?;

    println!("Charts written to probe_lengths.png and lost_keys.png");
    Ok(())
}
