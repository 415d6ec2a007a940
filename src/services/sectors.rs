// src/services/sectors.rs
use crate::config::ProviderKind;
use crate::models::{Mover, SectorSummary};
use crate::services::calculations::round_to;

/// Board layout of the open-data aggregator, where boards are addressed by
/// name: category followed by its board names.
pub const AGGREGATOR_SECTORS: &[(&str, &[&str])] = &[
    ("指数", &["上证50", "沪深300", "中证500", "创业板50", "科创50"]),
    ("金融", &["银行", "证券", "保险"]),
    ("工业", &["工业", "工程机械"]),
    ("原材料", &["原材料", "钢铁", "有色金属"]),
    ("消费", &["消费", "汽车", "新能源汽车", "食品饮料", "白酒"]),
    ("医疗保健", &["医疗保健", "医疗器械", "医药"]),
    ("信息技术", &["信息技术", "半导体", "芯片", "消费电子"]),
    ("新能源", &["新能源", "光伏", "锂电池"]),
];

/// Terminal layout: (code, name) pairs. The consumer category is split into
/// discretionary and staples here.
pub const TERMINAL_SECTORS: &[(&str, &[(&str, &str)])] = &[
    (
        "指数",
        &[
            ("000016.SH", "上证50"),
            ("000300.SH", "沪深300"),
            ("000905.SH", "中证500"),
            ("399006.SZ", "创业板50"),
            ("000688.SH", "科创50"),
        ],
    ),
    (
        "金融",
        &[("881001.WI", "银行"), ("881002.WI", "证券"), ("881003.WI", "保险")],
    ),
    ("工业", &[("881004.WI", "工业"), ("881005.WI", "工程机械")]),
    (
        "原材料",
        &[("881006.WI", "原材料"), ("881007.WI", "钢铁"), ("881008.WI", "有色金属")],
    ),
    (
        "消费",
        &[
            ("881009.WI", "可选消费"),
            ("881010.WI", "汽车"),
            ("881011.WI", "新能源汽车"),
            ("881012.WI", "日常消费"),
            ("881013.WI", "白酒"),
        ],
    ),
    (
        "医疗保健",
        &[("881014.WI", "医疗保健"), ("881015.WI", "医疗器械"), ("881016.WI", "医药")],
    ),
    (
        "信息技术",
        &[
            ("881017.WI", "信息技术"),
            ("881018.WI", "半导体"),
            ("881019.WI", "芯片"),
            ("881020.WI", "消费电子"),
        ],
    ),
    (
        "新能源",
        &[("881021.WI", "新能源"), ("881022.WI", "光伏"), ("881023.WI", "锂电池")],
    ),
];

/// One dashboard board as a provider addresses it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectorConfig {
    pub category: &'static str,
    pub code: &'static str,
    pub name: &'static str,
}

/// Flattened board list for `provider`, in display order.
pub fn configured_sectors(provider: ProviderKind) -> Vec<SectorConfig> {
    match provider {
        ProviderKind::Aggregator => AGGREGATOR_SECTORS
            .iter()
            .flat_map(|&(category, names)| {
                names.iter().map(move |&name| SectorConfig {
                    category,
                    code: name,
                    name,
                })
            })
            .collect(),
        ProviderKind::Terminal => TERMINAL_SECTORS
            .iter()
            .flat_map(|&(category, boards)| {
                boards.iter().map(move |&(code, name)| SectorConfig {
                    category,
                    code,
                    name,
                })
            })
            .collect(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Constituent {
    pub name: String,
    /// Daily change in percent; `None` when the provider cell was not numeric.
    pub change: Option<f64>,
}

fn mover(c: &Constituent, change: f64) -> Mover {
    Mover {
        name: c.name.clone(),
        change_percent: round_to(change, 2),
    }
}

/// Summary of one board from its constituent list. Unparseable changes count
/// as flat. Ties for top gainer/loser go to the first listed stock.
pub fn summarize_sector(
    category: &str,
    name: &str,
    board_change: f64,
    constituents: &[Constituent],
) -> SectorSummary {
    let mut summary = SectorSummary::zero(category, name);
    summary.change_percent = round_to(board_change, 2);

    let mut top: Option<(&Constituent, f64)> = None;
    let mut bottom: Option<(&Constituent, f64)> = None;

    for c in constituents {
        let change = c.change.unwrap_or(0.0);
        if change > 0.0 {
            summary.up_count += 1;
        } else if change < 0.0 {
            summary.down_count += 1;
        }
        if top.map_or(true, |(_, best)| change > best) {
            top = Some((c, change));
        }
        if bottom.map_or(true, |(_, worst)| change < worst) {
            bottom = Some((c, change));
        }
    }

    if let Some((c, change)) = top {
        summary.top_gainer = mover(c, change);
    }
    if let Some((c, change)) = bottom {
        summary.top_loser = mover(c, change);
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stock(name: &str, change: Option<f64>) -> Constituent {
        Constituent {
            name: name.to_string(),
            change,
        }
    }

    fn names(provider: ProviderKind) -> Vec<(&'static str, &'static str)> {
        configured_sectors(provider)
            .iter()
            .map(|s| (s.category, s.name))
            .collect()
    }

    #[test]
    fn layout_has_every_configured_sector() {
        let all = names(ProviderKind::Aggregator);
        assert_eq!(all.len(), 28);
        assert_eq!(all[0], ("指数", "上证50"));
        assert_eq!(all.last(), Some(&("新能源", "锂电池")));
        assert!(configured_sectors(ProviderKind::Aggregator)
            .iter()
            .all(|s| s.code == s.name));
    }

    #[test]
    fn terminal_layout_splits_consumer_boards() {
        let all = names(ProviderKind::Terminal);
        assert_eq!(all.len(), 28);
        assert!(all.contains(&("消费", "可选消费")));
        assert!(all.contains(&("消费", "日常消费")));
        assert!(!all.contains(&("消费", "食品饮料")));

        let staples = configured_sectors(ProviderKind::Terminal)
            .into_iter()
            .find(|s| s.name == "日常消费")
            .unwrap();
        assert_eq!(staples.code, "881012.WI");
    }

    #[test]
    fn summarizes_constituents() {
        let stocks = vec![
            stock("招商银行", Some(1.234)),
            stock("兴业银行", Some(-0.5)),
            stock("平安银行", None),
            stock("工商银行", Some(2.5)),
            stock("建设银行", Some(-1.75)),
        ];
        let s = summarize_sector("金融", "银行", 0.876, &stocks);
        assert_eq!(s.change_percent, 0.88);
        assert_eq!(s.up_count, 2);
        assert_eq!(s.down_count, 2);
        assert_eq!(s.top_gainer.name, "工商银行");
        assert_eq!(s.top_gainer.change_percent, 2.5);
        assert_eq!(s.top_loser.name, "建设银行");
        assert_eq!(s.top_loser.change_percent, -1.75);
        assert!(s.error.is_none());
    }

    #[test]
    fn ties_keep_first_listed() {
        let stocks = vec![stock("甲", Some(1.0)), stock("乙", Some(1.0))];
        let s = summarize_sector("指数", "上证50", 0.0, &stocks);
        assert_eq!(s.top_gainer.name, "甲");
        assert_eq!(s.top_loser.name, "甲");
    }

    #[test]
    fn empty_board_has_blank_movers() {
        let s = summarize_sector("新能源", "光伏", -1.2, &[]);
        assert_eq!(s.change_percent, -1.2);
        assert_eq!(s.top_gainer, Mover::default());
        assert_eq!(s.up_count, 0);
    }
}
