use std::io::Read;
use std::path::Path;

use anyhow::Context;
use rand::SeedableRng;
use rand::rngs::StdRng;

use roster_core::{BatchPayload, RosterConfig};
use roster_sync::{Reconciler, run_batch};

pub async fn batch(config: &RosterConfig, file: Option<&Path>) -> anyhow::Result<()> {
    let payload = read_payload(file)?;
    let reconciler = Reconciler::new(super::gateway(config)?);

    let mut rng = StdRng::from_entropy();
    let outcome = run_batch(&reconciler, &payload.data, &mut rng).await;
    println!("{}", outcome.text());
    Ok(())
}

fn read_payload(file: Option<&Path>) -> anyhow::Result<BatchPayload> {
    let raw = match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read standard input")?;
            buf
        }
    };
    BatchPayload::from_json(&raw).context("invalid batch payload")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_payload_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("work.json");
        std::fs::write(
            &path,
            r#"{"data": [{"courseId": 5, "sectionNames": ["A"]}]}"#,
        )
        .unwrap();

        let payload = read_payload(Some(&path)).unwrap();
        assert_eq!(payload.data.len(), 1);
        assert_eq!(payload.data[0].course_id, "5");
    }

    #[test]
    fn rejects_malformed_payload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("work.json");
        std::fs::write(&path, r#"{"items": []}"#).unwrap();

        let err = read_payload(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("invalid batch payload"));
    }
}
