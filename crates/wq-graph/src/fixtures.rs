//! Seeded snapshot and store helpers for tests.
//!
//! Verses (source id = verse):
//! `1 = 2:2`, `2 = 3:7`, `3 = 96:1`, `4 = 2:3`, `5 = 112:1`.
//!
//! Resulting `SHARES_ROOT` edges: `(1,2,ktb,2)`, `(1,2,Elm,2)`, `(2,3,ktb,1)`,
//! `(3,5,qwl,1)`. Verses 1 and 3 only share the identical word الكتاب, so
//! they are not linked. Root `nwr` has no words; `Hmd` occurs only in 2:3.

use wq_db::queries::{ayahs, roots, surahs, words};
use wq_db::DbPool;

use crate::store::SqliteGraphStore;
use crate::sync::{run_full_sync, SyncOptions};

const SURAHS: &[(i64, &str, i64, &str, i64)] = &[
    (2, "البقرة", 87, "medinan", 286),
    (3, "آل عمران", 89, "medinan", 200),
    (96, "العلق", 1, "meccan", 19),
    (112, "الإخلاص", 22, "meccan", 4),
];

/// (id, surah id, verse number)
const AYAHS: &[(i64, i64, i64)] = &[(1, 2, 2), (2, 3, 7), (3, 96, 1), (4, 2, 3), (5, 112, 1)];

const ROOTS: &[(i64, &str, &str, i64)] = &[
    (1, "ktb", "كتب", 3),
    (2, "Elm", "علم", 3),
    (3, "qwl", "قول", 2),
    (4, "Hmd", "حمد", 1),
    (5, "nwr", "نور", 0),
];

const WORDS: &[(i64, &str, Option<i64>, Option<&str>, Option<&str>)] = &[
    (10, "الكتاب", Some(1), Some("kitAb"), Some("N")),
    (11, "كتب", Some(1), Some("kataba"), Some("V")),
    (12, "يعلمون", Some(2), Some("Ealima"), Some("V")),
    (13, "العلم", Some(2), Some("Eilm"), Some("N")),
    (14, "قال", Some(3), Some("qAla"), Some("V")),
    (15, "قل", Some(3), Some("qAla"), Some("V")),
    (20, "في", None, None, Some("P")),
    (21, "الحمد", Some(4), Some("Hamd"), Some("N")),
];

/// (word id, ayah id, position)
const OCCURRENCES: &[(i64, i64, i64)] = &[
    (10, 1, 1),
    (12, 1, 2),
    (20, 1, 3),
    (10, 1, 5),
    (11, 2, 1),
    (13, 2, 2),
    (13, 2, 4),
    (10, 3, 1),
    (14, 3, 2),
    (20, 4, 1),
    (21, 4, 2),
    (15, 5, 1),
];

/// In-memory relational snapshot with the fixture rows.
pub fn seed_snapshot() -> DbPool {
    let pool = wq_db::init_memory_pool().expect("in-memory snapshot");

    for &(number, name, order, period, count) in SURAHS {
        let row = surahs::SurahRow {
            id: number,
            number,
            name_arabic: name.to_string(),
            revelation_order: order,
            period: period.to_string(),
            ayah_count: count,
        };
        surahs::insert_surah(&pool, &row).expect("surah");
    }
    for &(id, surah_id, number) in AYAHS {
        ayahs::insert_ayah(&pool, id, surah_id, number, "").expect("ayah");
    }
    for &(id, key, arabic, count) in ROOTS {
        roots::insert_root(&pool, id, key, arabic, count).expect("root");
    }
    for &(id, text, root_id, lemma, pos) in WORDS {
        words::insert_word(&pool, id, text, root_id, lemma, pos).expect("word");
    }
    for &(word_id, ayah_id, position) in OCCURRENCES {
        words::insert_occurrence(&pool, word_id, ayah_id, position).expect("occurrence");
    }

    pool
}

/// In-memory graph store rebuilt from [`seed_snapshot`].
pub async fn synced_store() -> SqliteGraphStore {
    let db = seed_snapshot();
    let store = SqliteGraphStore::in_memory().expect("in-memory graph");
    run_full_sync(&store, &db, &SyncOptions::default())
        .await
        .expect("fixture sync");
    store
}
