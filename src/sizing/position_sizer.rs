use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::debug;

use crate::common::errors::SizingError;
use crate::common::types::InstrumentSpec;

/// Outcome of a sizing calculation
pub type SizingResult = std::result::Result<SizedVolume, SizingError>;

/// How the raw volume was brought into the broker's legal range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeAdjustment {
    /// Rounded down to a multiple of the volume step
    Quantized,
    /// Below the minimum, raised to `volume_min`
    RaisedToMin,
    /// Above the maximum, capped at `volume_max`
    CappedAtMax,
}

/// Broker-legal volume together with the intermediates that produced it
#[derive(Debug, Clone, PartialEq)]
pub struct SizedVolume {
    pub volume: Decimal,
    pub raw_volume: Decimal,
    pub risk_amount: Decimal,
    pub stop_ticks: Decimal,
    pub loss_per_lot: Decimal,
    pub adjustment: VolumeAdjustment,
}

/// Converts a percentage-of-equity risk into a lot size
///
/// # Algorithm
///
/// ```text
/// risk_amount  = equity * risk_percent / 100
/// stop_ticks   = |entry - stop_loss| / tick_size
/// loss_per_lot = stop_ticks * tick_value
/// raw_volume   = risk_amount / loss_per_lot
/// ```
///
/// The raw volume is then raised to `volume_min`, capped at `volume_max`, or
/// otherwise floored to a multiple of `volume_step`. Flooring never rounds up,
/// so the position never risks more than requested. Only the final volume is
/// rounded.
#[derive(Debug, Clone)]
pub struct PositionSizer {
    max_risk_percent: Decimal,
}

impl PositionSizer {
    pub fn new() -> Self {
        Self {
            max_risk_percent: dec!(100),
        }
    }

    /// Reject risk percentages above `max_risk_percent`
    pub fn with_max_risk_percent(mut self, max_risk_percent: Decimal) -> Self {
        self.max_risk_percent = max_risk_percent;
        self
    }

    pub fn max_risk_percent(&self) -> Decimal {
        self.max_risk_percent
    }

    pub fn size(
        &self,
        equity: Decimal,
        risk_percent: Decimal,
        spec: &InstrumentSpec,
        entry: Decimal,
        stop_loss: Decimal,
    ) -> SizingResult {
        self.validate(equity, risk_percent, spec, entry, stop_loss)?;

        let risk_amount = equity
            .checked_mul(risk_percent)
            .and_then(|v| v.checked_div(dec!(100)))
            .ok_or_else(|| overflow("risk amount"))?;
        debug!(%equity, %risk_percent, %risk_amount, "Risk amount");

        debug!(
            contract_size = %spec.contract_size,
            tick_size = %spec.tick_size,
            tick_value = %spec.tick_value,
            volume_min = %spec.volume_min,
            volume_max = %spec.volume_max,
            volume_step = %spec.volume_step,
            "Instrument spec"
        );

        if spec.tick_size.is_zero() {
            return Err(SizingError::DegenerateStop { entry, stop_loss });
        }

        let stop_ticks = (entry - stop_loss)
            .abs()
            .checked_div(spec.tick_size)
            .ok_or_else(|| overflow("stop ticks"))?;
        debug!(%stop_ticks, "Stop loss in ticks");

        let loss_per_lot = stop_ticks
            .checked_mul(spec.tick_value)
            .ok_or_else(|| overflow("loss per lot"))?;
        debug!(%loss_per_lot, "Potential loss per lot");

        if loss_per_lot.is_zero() {
            return Err(SizingError::DegenerateStop { entry, stop_loss });
        }

        let raw_volume = risk_amount
            .checked_div(loss_per_lot)
            .ok_or_else(|| overflow("raw volume"))?;
        debug!(%raw_volume, "Volume before rounding");

        let (volume, adjustment) = Self::clamp_volume(raw_volume, spec)?;
        debug!(%volume, ?adjustment, "Final volume");

        Ok(SizedVolume {
            volume,
            raw_volume,
            risk_amount,
            stop_ticks,
            loss_per_lot,
            adjustment,
        })
    }

    fn clamp_volume(
        raw_volume: Decimal,
        spec: &InstrumentSpec,
    ) -> std::result::Result<(Decimal, VolumeAdjustment), SizingError> {
        if raw_volume < spec.volume_min {
            return Ok((spec.volume_min, VolumeAdjustment::RaisedToMin));
        }
        if raw_volume > spec.volume_max {
            return Ok((spec.volume_max, VolumeAdjustment::CappedAtMax));
        }

        let volume = raw_volume
            .checked_div(spec.volume_step)
            .map(|steps| steps.floor())
            .and_then(|steps| steps.checked_mul(spec.volume_step))
            .ok_or_else(|| overflow("volume steps"))?;
        // a min that is not itself a step multiple can floor below it
        Ok((volume.max(spec.volume_min), VolumeAdjustment::Quantized))
    }

    fn validate(
        &self,
        equity: Decimal,
        risk_percent: Decimal,
        spec: &InstrumentSpec,
        entry: Decimal,
        stop_loss: Decimal,
    ) -> std::result::Result<(), SizingError> {
        if equity < Decimal::ZERO {
            return Err(SizingError::InvalidInput(format!("negative equity {}", equity)));
        }
        if risk_percent <= Decimal::ZERO {
            return Err(SizingError::InvalidInput(format!(
                "risk percentage must be positive, got {}",
                risk_percent
            )));
        }
        if risk_percent > self.max_risk_percent {
            return Err(SizingError::InvalidInput(format!(
                "risk percentage {} exceeds limit {}",
                risk_percent, self.max_risk_percent
            )));
        }
        if entry < Decimal::ZERO || stop_loss < Decimal::ZERO {
            return Err(SizingError::InvalidInput("negative price".to_string()));
        }
        if spec.tick_size < Decimal::ZERO || spec.tick_value < Decimal::ZERO {
            return Err(SizingError::InvalidInput("negative tick economics".to_string()));
        }
        if spec.volume_step <= Decimal::ZERO {
            return Err(SizingError::InvalidInput(format!(
                "volume step must be positive, got {}",
                spec.volume_step
            )));
        }
        if spec.volume_min < Decimal::ZERO || spec.volume_max < spec.volume_min {
            return Err(SizingError::InvalidInput(format!(
                "invalid volume range [{}, {}]",
                spec.volume_min, spec.volume_max
            )));
        }
        Ok(())
    }
}

impl Default for PositionSizer {
    fn default() -> Self {
        Self::new()
    }
}

fn overflow(stage: &str) -> SizingError {
    SizingError::InvalidInput(format!("{} overflowed", stage))
}
