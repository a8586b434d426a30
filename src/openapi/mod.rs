use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Hospital Supply API",
        version = "1.0.0",
        description = r#"
# Hospital Supply API

Monthly meal-supply planning against procurement contracts, warehouse dispatch
requests, delivery receiving and provider non-compliance tracking.

## Identity

Operations on behalf of a hospital service take the acting user from the
`x-user-id` header (for example `USR01`). Unknown ids are rejected with 401.

## Catalog availability

Every planning, dispatch, delivery, reporting and penalty endpoint answers 503
until the contracts catalog has loaded. `POST /api/v1/catalog/reload` retries a
failed load and resets all in-memory activity.

## Error Handling

```json
{
  "error": "Unprocessable Entity",
  "message": "No planned items for USR01 on 2024-05-05 (Desayuno)",
  "request_id": "3f1c...",
  "timestamp": "2024-05-05T10:30:00Z"
}
```
        "#,
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development")
    ),
    tags(
        (name = "catalog", description = "Contract catalog queries and reload"),
        (name = "users", description = "Hospital service users"),
        (name = "planning", description = "Monthly plan submission"),
        (name = "dispatches", description = "Warehouse dispatch requests"),
        (name = "deliveries", description = "Delivery consolidation and receiving"),
        (name = "reports", description = "Monthly matrix and provider exports"),
        (name = "penalties", description = "Non-compliance reports")
    ),
    paths(
        crate::handlers::catalog::list_contracts,
        crate::handlers::catalog::grouped_contracts,
        crate::handlers::catalog::catalog_options,
        crate::handlers::catalog::plannable_items,
        crate::handlers::catalog::get_contract,
        crate::handlers::catalog::reload_catalog,

        crate::handlers::users::list_users,
        crate::handlers::users::current_user,

        crate::handlers::planning::planning_days,
        crate::handlers::planning::submit_plan,
        crate::handlers::planning::list_my_entries,

        crate::handlers::dispatches::generate_dispatch,
        crate::handlers::dispatches::preview_dispatch,
        crate::handlers::dispatches::list_dispatches,
        crate::handlers::dispatches::get_dispatch,
        crate::handlers::dispatches::update_dispatch_status,
        crate::handlers::dispatches::print_dispatch,

        crate::handlers::deliveries::list_consolidations,
        crate::handlers::deliveries::delivery_calendar,
        crate::handlers::deliveries::set_delivery_status,

        crate::handlers::reports::monthly_matrix,
        crate::handlers::reports::provider_summary,

        crate::handlers::penalties::list_reports,
        crate::handlers::penalties::update_report_status,
    ),
    components(
        schemas(
            crate::handlers::catalog::CatalogReloaded,
            crate::handlers::planning::SubmitPlanRequest,
            crate::handlers::planning::PlanningSheet,
            crate::handlers::dispatches::DispatchSlot,
            crate::handlers::dispatches::DispatchPreview,
            crate::handlers::dispatches::UpdateDispatchStatusRequest,
            crate::handlers::deliveries::SetDeliveryStatusRequest,
            crate::handlers::penalties::UpdateReportStatusRequest,
            crate::planner::DeliveryStatusChange,
            crate::errors::ErrorResponse
        )
    )
)]
pub struct ApiDocV1;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDocV1::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}
