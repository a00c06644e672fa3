//! Demo data: three titles with patch graphs of different shapes

use chrono::{DateTime, Duration, Utc};
use patchpath_core::VersionId;

use crate::error::Result;
use crate::model::*;
use crate::store::MemoryStore;

const MB: i64 = 1_000_000;
const GB: u64 = 1_000_000_000;

/// Populate an empty store with demo titles. Does nothing if any title exists.
///
/// "Starfall Odyssey" has a branching graph: the direct 1.0.0 -> 1.4.0 patch
/// (800 MB) and the full incremental chain (550 MB) both lose to
/// 1.0.0 -> 1.2.0 -> 1.4.0 (450 MB).
pub async fn seed(store: &MemoryStore) -> Result<()> {
    if !store.titles().await.is_empty() {
        return Ok(());
    }
    let now = Utc::now();
    let days = |n: i64| now - Duration::days(n);

    let starfall = store
        .add_title_at(title("Starfall Odyssey", "Lumen Forge"), days(180))
        .await?;
    let ember = store
        .add_title_at(title("Ember Realms Online", "Hearthlight Studios"), days(90))
        .await?;
    let circuit = store
        .add_title_at(title("Circuit Rush", "Redline Interactive"), days(30))
        .await?;

    let mut sf = Vec::new();
    for (label, size, age) in [
        ("1.0.0", 5_000, 180),
        ("1.1.0", 5_100, 150),
        ("1.2.0", 5_200, 120),
        ("1.3.0", 5_500, 60),
        ("1.4.0", 5_600, 14),
    ] {
        sf.push(add_version(store, starfall.id, label, size, days(age)).await?);
    }

    let mut er = Vec::new();
    for (label, size, age) in [("1.0.0", 8_000, 90), ("1.0.1", 8_050, 60), ("1.1.0", 8_500, 30)] {
        er.push(add_version(store, ember.id, label, size, days(age)).await?);
    }

    let mut cr = Vec::new();
    for (label, size, age) in [("1.0.0", 3_000, 30), ("1.0.1", 3_020, 7)] {
        cr.push(add_version(store, circuit.id, label, size, days(age)).await?);
    }

    let sf_patches = [
        (0, 4, 800, "sf1a04", 14),
        (0, 1, 150, "sf2b11", 150),
        (1, 2, 120, "sf3c12", 120),
        (2, 3, 180, "sf4d13", 60),
        (3, 4, 100, "sf5e14", 14),
        (0, 2, 200, "sf6f02", 120),
        (2, 4, 250, "sf7a24", 14),
    ];
    let mut sf_ids = Vec::new();
    for (from, to, size_mb, checksum, age) in sf_patches {
        let patch = add_patch(store, "sf", &sf, from, to, size_mb, checksum, days(age)).await?;
        sf_ids.push(patch.edge.id);
    }

    let er_patches = [
        (0, 1, 50, "er1a01", 60),
        (1, 2, 450, "er2b12", 30),
        (0, 2, 480, "er3c02", 30),
    ];
    let mut er_ids = Vec::new();
    for (from, to, size_mb, checksum, age) in er_patches {
        let patch = add_patch(store, "er", &er, from, to, size_mb, checksum, days(age)).await?;
        er_ids.push(patch.edge.id);
    }

    let cr_patch = add_patch(store, "cr", &cr, 0, 1, 25, "cr1a01", days(7)).await?;

    let downloads = [
        (sf_ids[1], "192.168.1.100", days(10), Some(DownloadStatus::Completed)),
        (sf_ids[1], "192.168.1.101", days(9), Some(DownloadStatus::Completed)),
        (sf_ids[2], "192.168.1.100", days(8), Some(DownloadStatus::Completed)),
        (er_ids[0], "10.0.0.50", days(5), Some(DownloadStatus::Completed)),
        (er_ids[1], "10.0.0.51", days(3), Some(DownloadStatus::Failed)),
        (cr_patch.edge.id, "172.16.0.10", now - Duration::hours(2), None),
    ];
    for (patch, addr, started_at, outcome) in downloads {
        let info = store.start_download_at(patch, addr, started_at).await?;
        if let Some(status) = outcome {
            store
                .finish_download(info.download_id, status, started_at + Duration::minutes(5))
                .await?;
        }
    }

    tracing::info!("Seeded demo data for 3 titles");
    Ok(())
}

fn title(name: &str, publisher: &str) -> NewTitle {
    NewTitle {
        name: name.to_string(),
        publisher: Some(publisher.to_string()),
    }
}

async fn add_version(
    store: &MemoryStore,
    title: patchpath_core::TitleId,
    label: &str,
    size_mb: u64,
    released_at: DateTime<Utc>,
) -> Result<VersionId> {
    let new = NewVersion {
        label: label.to_string(),
        total_size_bytes: size_mb * GB / 1_000,
        is_active: true,
    };
    Ok(store.add_version_at(title, new, released_at).await?.id)
}

#[allow(clippy::too_many_arguments)]
async fn add_patch(
    store: &MemoryStore,
    prefix: &str,
    versions: &[VersionId],
    from: usize,
    to: usize,
    size_mb: i64,
    checksum: &str,
    created_at: DateTime<Utc>,
) -> Result<PatchRecord> {
    let (from, to) = (versions[from], versions[to]);
    let from_label = store.version(from).await.map(|v| v.label).unwrap_or_default();
    let to_label = store.version(to).await.map(|v| v.label).unwrap_or_default();
    let new = NewPatch {
        from_version_id: from,
        to_version_id: to,
        file_name: format!("{prefix}_{from_label}_to_{to_label}.patch"),
        size_bytes: size_mb * MB,
        checksum: checksum.to_string(),
    };
    store.add_patch_at(new, created_at).await
}
