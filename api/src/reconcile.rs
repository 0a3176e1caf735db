//! Hand-verified corrections for venue codes whose official name does not
//! resolve against Wikipedia as-is.

use crate::VenueNames;
use log::warn;
use std::collections::BTreeMap;

/// Placeholder code used by the schedule before a venue is decided.
pub const UNDECIDED_VENUE: &str = "●未定●";

/// venue code → article title that geocodes. Each entry was checked by hand
/// against the article it should land on; the comment is the official name.
pub const CORRECTIONS: [(&str, &str); 17] = [
    ("パナスタ", "パナソニックスタジアム吹田"),                 // パナソニック スタジアム 吹田
    ("ＪＦＥス", "JFE晴れの国スタジアム"),                     // ＪＦＥ晴れの国スタジアム
    ("Ｕ等々力", "Uvanceとどろきスタジアム by Fujitsu"),        // Ｕｖａｎｃｅとどろきスタジアム　ｂｙ　Ｆｕｊｉｔｓｕ
    ("ＮＡＣＫ", "NACK5スタジアム大宮"),                        // ＮＡＣＫ５スタジアム大宮
    ("ＪＩＴス", "JIT リサイクルインク スタジアム"),            // ＪＩＴ　リサイクルインク　スタジアム
    ("ヤマハ", "ヤマハスタジアム"),                             // ヤマハスタジアム（磐田）
    ("Ｇスタ", "町田GIONスタジアム"),                           // 町田ＧＩＯＮスタジアム
    ("アイスタ", "IAIスタジアム日本平"),                        // ＩＡＩスタジアム日本平
    ("サンガＳ", "サンガスタジアム by KYOCERA"),                // サンガスタジアム by ＫＹＯＣＥＲＡ
    ("カシマ", "茨城県立カシマサッカースタジアム"),             // 県立カシマサッカースタジアム
    ("鳴門大塚", "鳴門・大塚スポーツパークポカリスエットスタジアム"), // 鳴門・大塚スポーツパーク ポカリスエットスタジアム
    ("ピカスタ", "Pikaraスタジアム"),                           // Ｐｉｋａｒａスタジアム
    ("長野Ｕ", "長野Uスタジアム"),                              // 長野Ｕスタジアム
    ("埼玉", "埼玉スタジアム2002"),                             // 埼玉スタジアム２００２
    ("Ａｘｉｓ", "Axisバードスタジアム"),                       // Ａｘｉｓバードスタジアム
    ("ＮＤスタ", "NDソフトスタジアム山形"),                     // ＮＤソフトスタジアム山形
    ("あいづ", "あいづ陸上競技場"),                             // 会津総合運動公園あいづ陸上競技場
];

pub fn correction_for(code: &str) -> Option<&'static str> {
    CORRECTIONS
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    Undecided,
    EmptyName,
    Ambiguous,
}

/// Cleaned venue names, ready for geocoding.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Reconciled {
    /// venue code → name to query
    pub names: BTreeMap<String, String>,
    pub dropped: Vec<(String, DropReason)>,
}

impl Reconciled {
    /// Every code carrying `long_name`. Several codes may share one stadium.
    pub fn codes_for<'a>(&'a self, long_name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.names
            .iter()
            .filter(move |(_, name)| name.as_str() == long_name)
            .map(|(code, _)| code.as_str())
    }

    /// Distinct long names in code order.
    pub fn long_names(&self) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        self.names
            .values()
            .filter(|name| seen.insert(name.as_str()))
            .cloned()
            .collect()
    }
}

/// Apply the correction table, then drop whatever still has no usable name.
pub fn reconcile(raw: &VenueNames) -> Reconciled {
    let mut out = Reconciled::default();
    for (code, entry) in raw {
        if code == UNDECIDED_VENUE {
            out.dropped.push((code.clone(), DropReason::Undecided));
            continue;
        }
        if let Some(corrected) = correction_for(code) {
            out.names.insert(code.clone(), corrected.to_owned());
            continue;
        }
        match entry.resolved() {
            Some(name) => {
                out.names.insert(code.clone(), name.to_owned());
            }
            None => {
                let reason = match entry {
                    crate::VenueNameEntry::Candidates(names) if names.len() > 1 => DropReason::Ambiguous,
                    _ => DropReason::EmptyName,
                };
                warn!("dropping venue {code}: {reason:?}");
                out.dropped.push((code.clone(), reason));
            }
        }
    }
    out
}
