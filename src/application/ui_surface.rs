// UI element layer the dashboard writes display values into
//
// Layout belongs to the surface; the core only addresses elements by id.

pub trait UiSurface: Send + Sync {
    fn set_text(&self, element: &str, text: &str);
    fn set_enabled(&self, element: &str, enabled: bool);
    fn set_visible(&self, element: &str, visible: bool);
    /// Progress bars take a percentage in `[0, 100]`.
    fn set_progress(&self, element: &str, percent: f64);
    fn set_rows(&self, element: &str, rows: Vec<Vec<String>>);
}

/// Element ids shared by loaders and surfaces.
pub mod elements {
    pub const STATUS_DOT: &str = "statusDot";
    pub const STATUS_TEXT: &str = "statusText";
    pub const ERROR_BANNER: &str = "errorBanner";
    pub const LAST_UPDATE: &str = "lastUpdate";

    pub const CURRENT_OCCUPANCY: &str = "currentOccupancy";
    pub const AC_LEVEL: &str = "acLevel";
    pub const CURRENT_TEMP: &str = "currentTemp";
    pub const CURRENT_HUMIDITY: &str = "currentHumidity";
    pub const TEMP_RANGE: &str = "sensorTempRange";

    pub const OCC_PERSONS: &str = "occPersons";
    pub const OCC_PERCENT: &str = "occPercent";
    pub const OCC_PROGRESS: &str = "occProgressBar";
    pub const OCC_AC_LEVEL: &str = "occAcLevel";
    pub const OCC_AC_NOTE: &str = "occAcNote";
    pub const ESTIMATOR_MODEL: &str = "estimatorModel";
    pub const ESTIMATOR_SAMPLES: &str = "estimatorSamples";
    pub const ESTIMATOR_CALIBRATED: &str = "estimatorCalibrated";
    pub const ESTIMATOR_BASELINE: &str = "estimatorBaseline";

    pub const SENSOR_TEMP: &str = "sensorTemp";
    pub const SENSOR_HUMIDITY: &str = "sensorHumidity";
    pub const SENSOR_PRESSURE: &str = "sensorPressure";
    pub const SENSOR_GAS: &str = "sensorGas";
    pub const SENSOR_MOVEMENT: &str = "sensorMovement";
    pub const SENSOR_MOVEMENT_STATUS: &str = "sensorMovementStatus";
    pub const SENSOR_HUMIDITY_AVG: &str = "sensorHumidityAvg";
    pub const SENSOR_PRESSURE_AVG: &str = "sensorPressureAvg";
    pub const SENSOR_LAST_READING: &str = "sensorLastReading";

    pub const TABLE_BODY: &str = "tableBody";
    pub const PAGE_INFO: &str = "pageInfo";
    pub const TABLE_INFO: &str = "tableInfo";
    pub const BTN_PREV: &str = "btnPrev";
    pub const BTN_NEXT: &str = "btnNext";

    pub const REG_TRAINED: &str = "regTrained";
    pub const REG_SLOPE: &str = "regSlope";
    pub const REG_INTERCEPT: &str = "regIntercept";
    pub const REG_R_SQUARED: &str = "regRSquared";
    pub const REG_SAMPLES: &str = "regSamples";
    pub const REG_TRAINED_AT: &str = "regTrainedAt";
    pub const REG_LAST_ERROR: &str = "regLastError";
    pub const REG_MESSAGE: &str = "regMessage";
    pub const BTN_RETRAIN: &str = "btnRetrain";

    /// Status line shown under a chart when its loader got no data.
    pub fn chart_status(chart_id: &str) -> String {
        format!("{}Status", chart_id)
    }
}
