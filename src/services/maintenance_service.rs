//! Pronóstico de mantenimiento
//!
//! Dado el odómetro reconciliado y una distancia planeada, lista los
//! intervalos de servicio fijos que vencen dentro del recorrido.

use crate::models::maintenance::{MaintenanceForecast, MaintenanceStep, SERVICE_INTERVALS};

/// Calcular las tareas de servicio que vencen dentro de `travel_km`.
/// Entradas ausentes producen un resultado explícito, no un error.
pub fn forecast(current_km: Option<i64>, travel_km: Option<i64>) -> MaintenanceForecast {
    let (Some(current), Some(travel)) = (current_km, travel_km) else {
        return MaintenanceForecast::InsufficientData;
    };
    if current < 0 || travel < 0 {
        return MaintenanceForecast::InsufficientData;
    }

    let future_km = current + travel;
    let mut steps = Vec::new();

    for (interval, tasks) in SERVICE_INTERVALS.iter() {
        let next_due_km = ((current / interval) + 1) * interval;
        if next_due_km <= future_km {
            steps.push(MaintenanceStep {
                interval_km: *interval,
                km_remaining: next_due_km - current,
                due_at_km: next_due_km,
                tasks: tasks.iter().map(|t| t.to_string()).collect(),
            });
        }
    }

    if steps.is_empty() {
        MaintenanceForecast::NothingDue { travel_km: travel }
    } else {
        MaintenanceForecast::Due {
            current_km: current,
            travel_km: travel,
            steps,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forecast_due_within_travel() {
        let result = forecast(Some(4_800), Some(300));
        match result {
            MaintenanceForecast::Due { steps, .. } => {
                assert_eq!(steps.len(), 1);
                assert_eq!(steps[0].interval_km, 5_000);
                assert_eq!(steps[0].due_at_km, 5_000);
                assert_eq!(steps[0].km_remaining, 200);
                assert_eq!(steps[0].tasks.len(), 3);
            }
            other => panic!("se esperaba Due, fue {:?}", other),
        }
    }

    #[test]
    fn test_forecast_nothing_due() {
        assert_eq!(
            forecast(Some(4_800), Some(100)),
            MaintenanceForecast::NothingDue { travel_km: 100 }
        );
    }

    #[test]
    fn test_forecast_multiple_intervals() {
        // 9500 + 11000 cruza los vencimientos de 10000 y 20000
        let result = forecast(Some(9_500), Some(11_000));
        match result {
            MaintenanceForecast::Due { steps, .. } => {
                let intervals: Vec<i64> = steps.iter().map(|s| s.interval_km).collect();
                assert_eq!(intervals, vec![5_000, 10_000, 20_000]);
                assert_eq!(steps[1].due_at_km, 10_000);
                assert_eq!(steps[2].due_at_km, 20_000);
            }
            other => panic!("se esperaba Due, fue {:?}", other),
        }
    }

    #[test]
    fn test_forecast_insufficient_data() {
        assert_eq!(forecast(None, Some(500)), MaintenanceForecast::InsufficientData);
        assert_eq!(forecast(Some(4_800), None), MaintenanceForecast::InsufficientData);
        assert_eq!(forecast(Some(-1), Some(500)), MaintenanceForecast::InsufficientData);
    }
}
