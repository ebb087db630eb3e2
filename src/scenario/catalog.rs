//! Relocation scenario catalog

use serde::{Deserialize, Serialize};

/// One staffing and automation strategy for the relocated warehouse
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelocationScenario {
    /// Stable key used in exports
    pub key: String,
    /// Display name used in reports
    pub name: String,
    /// Share of the current staff expected to leave with the move (0.0-1.0)
    pub staff_attrition_rate: f64,
    /// Retention spending in rubles, carried through for cost models
    pub hr_investment_rub: u64,
    /// Automation spending in rubles, carried through for cost models
    pub automation_investment_rub: u64,
    /// Processing-speed multiplier the strategy buys
    pub efficiency_multiplier: f64,
}

impl RelocationScenario {
    /// Operators left after attrition, rounded down
    pub fn staff_count(&self, initial_staff: usize) -> usize {
        (initial_staff as f64 * (1.0 - self.staff_attrition_rate)).floor() as usize
    }
}

/// The four strategies compared for the move
pub fn relocation_scenarios() -> Vec<RelocationScenario> {
    let scenario = |key: &str, name: &str, attrition: f64, hr: u64, automation: u64, efficiency: f64| {
        RelocationScenario {
            key: key.to_string(),
            name: name.to_string(),
            staff_attrition_rate: attrition,
            hr_investment_rub: hr,
            automation_investment_rub: automation,
            efficiency_multiplier: efficiency,
        }
    };

    vec![
        scenario("1_Move_No_Mitigation", "1. Move No Mitigation", 0.25, 0, 0, 1.0),
        scenario("2_Move_With_Compensation", "2. Move With Compensation", 0.15, 50_000_000, 0, 1.0),
        scenario("3_Move_Basic_Automation", "3. Move Basic Automation", 0.25, 0, 100_000_000, 1.25),
        scenario("4_Move_Advanced_Automation", "4. Move Advanced Automation", 0.25, 0, 300_000_000, 2.0),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_contents() {
        let scenarios = relocation_scenarios();
        assert_eq!(scenarios.len(), 4);
        assert_eq!(scenarios[0].name, "1. Move No Mitigation");
        assert_eq!(scenarios[3].efficiency_multiplier, 2.0);
    }

    #[test]
    fn test_staff_after_attrition() {
        let counts: Vec<usize> =
            relocation_scenarios().iter().map(|s| s.staff_count(100)).collect();
        assert_eq!(counts, vec![75, 85, 75, 75]);
    }

    #[test]
    fn test_staff_count_rounds_down() {
        let scenario = RelocationScenario {
            staff_attrition_rate: 0.3,
            ..relocation_scenarios()[0].clone()
        };
        // 7 x 0.7 = 4.9
        assert_eq!(scenario.staff_count(7), 4);
        assert_eq!(scenario.staff_count(0), 0);
    }
}
