use utoipa::OpenApi;

use super::{health, lab_tests};
use crate::models::{ApiResponse, TestRecord};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Lab Report OCR API",
        description = "Extract test names, values, units and reference ranges from lab report images"
    ),
    paths(
        lab_tests::get_lab_tests,
        health::root,
        health::health_check,
    ),
    components(schemas(
        ApiResponse,
        TestRecord,
        lab_tests::ErrorDetail,
        lab_tests::LabReportUpload,
        health::RootMessage,
        health::HealthStatus,
    )),
    tags(
        (name = "lab-tests", description = "Lab report extraction"),
        (name = "health", description = "Service status"),
    )
)]
pub struct ApiDoc;
