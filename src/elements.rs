//! Five-element balance derived from a chart, shown on the dashboard.

use crate::models::FourPillarChart;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Element {
    Wood,
    Fire,
    Earth,
    Metal,
    Water,
}

impl Element {
    pub const ALL: [Element; 5] = [
        Element::Wood,
        Element::Fire,
        Element::Earth,
        Element::Metal,
        Element::Water,
    ];

    /// Element of a heavenly stem or earthly branch character.
    pub fn of_char(c: char) -> Option<Element> {
        match c {
            // Stems
            '甲' | '乙' => Some(Element::Wood),
            '丙' | '丁' => Some(Element::Fire),
            '戊' | '己' => Some(Element::Earth),
            '庚' | '辛' => Some(Element::Metal),
            '壬' | '癸' => Some(Element::Water),
            // Branches
            '寅' | '卯' => Some(Element::Wood),
            '巳' | '午' => Some(Element::Fire),
            '辰' | '戌' | '丑' | '未' => Some(Element::Earth),
            '申' | '酉' => Some(Element::Metal),
            '亥' | '子' => Some(Element::Water),
            _ => None,
        }
    }
}

/// Share of each element in percent; the five values sum to 100.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ElementBalance {
    pub wood: f64,
    pub fire: f64,
    pub earth: f64,
    pub metal: f64,
    pub water: f64,
}

impl ElementBalance {
    pub fn get(&self, element: Element) -> f64 {
        match element {
            Element::Wood => self.wood,
            Element::Fire => self.fire,
            Element::Earth => self.earth,
            Element::Metal => self.metal,
            Element::Water => self.water,
        }
    }

    pub fn total(&self) -> f64 {
        Element::ALL.iter().map(|e| self.get(*e)).sum()
    }

    /// Strongest element; ties resolve in `Element::ALL` order.
    pub fn dominant(&self) -> Element {
        Element::ALL
            .into_iter()
            .fold(Element::Wood, |best, e| {
                if self.get(e) > self.get(best) {
                    e
                } else {
                    best
                }
            })
    }
}

/// Count the elements of every recognised character in the four pillars.
///
/// Unrecognised tokens contribute nothing. A chart with no recognised
/// characters yields an even balance.
pub fn element_balance(chart: &FourPillarChart) -> ElementBalance {
    let mut counts = [0u32; 5];
    for pillar in chart.pillars() {
        for element in pillar.chars().filter_map(Element::of_char) {
            counts[element as usize] += 1;
        }
    }

    let total: u32 = counts.iter().sum();
    let share = |i: usize| {
        if total == 0 {
            100.0 / counts.len() as f64
        } else {
            counts[i] as f64 * 100.0 / total as f64
        }
    };

    ElementBalance {
        wood: share(Element::Wood as usize),
        fire: share(Element::Fire as usize),
        earth: share(Element::Earth as usize),
        metal: share(Element::Metal as usize),
        water: share(Element::Water as usize),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chart(year: &str, month: &str, day: &str, hour: &str) -> FourPillarChart {
        FourPillarChart {
            year: year.to_string(),
            month: month.to_string(),
            day: day.to_string(),
            hour: hour.to_string(),
        }
    }

    #[test]
    fn test_balance_for_reference_chart() {
        // 甲 wood, 子 water, 丙 fire, 寅 wood, 戊 earth, 辰 earth, 庚 metal, 申 metal
        let balance = element_balance(&chart("甲子", "丙寅", "戊辰", "庚申"));

        assert_eq!(balance.wood, 25.0);
        assert_eq!(balance.fire, 12.5);
        assert_eq!(balance.earth, 25.0);
        assert_eq!(balance.metal, 25.0);
        assert_eq!(balance.water, 12.5);
        assert!((balance.total() - 100.0).abs() < 1e-9);
        assert_eq!(balance.dominant(), Element::Wood);
    }

    #[test]
    fn test_balance_is_deterministic() {
        let c = chart("壬午", "癸亥", "己未", "辛酉");
        assert_eq!(element_balance(&c), element_balance(&c));
    }

    #[test]
    fn test_unrecognised_chart_is_even() {
        let balance = element_balance(&chart("A1", "B2", "C3", "D4"));
        for element in Element::ALL {
            assert_eq!(balance.get(element), 20.0);
        }
    }

    #[test]
    fn test_partial_recognition_ignores_unknown_characters() {
        let balance = element_balance(&chart("甲x", "?", "??", "午"));
        assert_eq!(balance.wood, 50.0);
        assert_eq!(balance.fire, 50.0);
        assert_eq!(balance.earth, 0.0);
    }
}
