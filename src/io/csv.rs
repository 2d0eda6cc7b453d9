/*!
# Saving Weighted Samples to CSV

Writes the output of an annealing run to a CSV file. Enable via the `csv` feature.
*/

use num_traits::Float;
use std::fmt::Display;
use std::fs::File;

use csv::Writer;

use crate::error::Result;
use crate::stats::SampleSet;

/**
Saves a set of weighted samples as a CSV file.

The resulting CSV file will have:
- A header row containing `"sample"`, `"log_weight"`, `"weight"` and one column per dimension
  named `"dim_0"`, `"dim_1"`, etc. The number of dimensions is taken from the first sample.
- One row per sample, in chain order.

Infinite and NaN values are written as `inf`, `-inf` and `NaN`.

# Examples

```rust
use mini_ais::core::WeightedSample;
use mini_ais::io::csv::save_csv;
use mini_ais::stats::SampleSet;

let samples = SampleSet::new(vec![
    WeightedSample::new(vec![1.0, 2.0], 0.0),
    WeightedSample::new(vec![3.0, 4.0], -1.5),
]);
save_csv(&samples, "/tmp/ais_output.csv")?;
# Ok::<(), mini_ais::error::AisError>(())
```
*/
pub fn save_csv<T: Float + Display>(samples: &SampleSet<T>, filename: &str) -> Result<()> {
    let mut wtr = Writer::from_writer(File::create(filename)?);
    let n_dims = samples.iter().next().map_or(0, |s| s.state.len());

    let mut header: Vec<String> = vec![
        "sample".to_string(),
        "log_weight".to_string(),
        "weight".to_string(),
    ];
    header.extend((0..n_dims).map(|i| format!("dim_{}", i)));
    wtr.write_record(&header)?;

    for (idx, sample) in samples.iter().enumerate() {
        let mut row = vec![
            idx.to_string(),
            sample.log_weight.to_string(),
            sample.weight().to_string(),
        ];
        row.extend(sample.state.iter().map(|v| v.to_string()));
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::WeightedSample;
    use csv::Reader;
    use std::fs;
    use tempfile::NamedTempFile;

    #[test]
    fn test_save_csv_empty_set() {
        let samples: SampleSet<f64> = SampleSet::new(vec![]);
        let file = NamedTempFile::new().expect("Could not create temp file");
        let filename = file.path().to_str().unwrap();

        save_csv(&samples, filename).unwrap();

        let contents = fs::read_to_string(filename).unwrap();
        assert_eq!(contents.trim(), "sample,log_weight,weight");
    }

    #[test]
    fn test_save_csv_rows() {
        let samples = SampleSet::new(vec![
            WeightedSample::new(vec![1.0, 2.0], 0.0),
            WeightedSample::new(vec![3.0, 4.0], f64::NEG_INFINITY),
        ]);
        let file = NamedTempFile::new().expect("Could not create temp file");
        let filename = file.path().to_str().unwrap();

        save_csv(&samples, filename).unwrap();

        let contents = fs::read_to_string(filename).unwrap();
        let expected = "\
sample,log_weight,weight,dim_0,dim_1
0,0,1,1,2
1,-inf,0,3,4";
        assert_eq!(contents.trim(), expected);
    }

    #[test]
    fn test_save_csv_parses_back() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let samples = SampleSet::new(vec![
            WeightedSample::new(vec![0.5], 2.0_f64.ln()),
            WeightedSample::new(vec![-0.25], 0.0),
            WeightedSample::new(vec![7.0], -1.0),
        ]);
        let file = NamedTempFile::new()?;
        let filename = file.path().to_str().unwrap();
        save_csv(&samples, filename)?;

        let mut rdr = Reader::from_path(filename)?;
        let headers = rdr.headers()?.clone();
        assert_eq!(&headers[0], "sample");
        assert_eq!(&headers[1], "log_weight");
        assert_eq!(&headers[2], "weight");
        assert_eq!(&headers[3], "dim_0");

        let records: Vec<_> = rdr.records().collect::<std::result::Result<_, _>>()?;
        assert_eq!(records.len(), 3);
        for (record, sample) in records.iter().zip(samples.iter()) {
            let weight: f64 = record[2].parse()?;
            let x: f64 = record[3].parse()?;
            assert!((weight - sample.weight()).abs() < 1e-12);
            assert_eq!(x, sample.state[0]);
        }
        Ok(())
    }
}
