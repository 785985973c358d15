#[cfg(test)]
mod tests {
    use crate::schemas::ApiDoc;
    use utoipa::OpenApi;

    #[test]
    fn test_openapi_schema_generation() {
        // Test that the OpenAPI schema can be generated without errors
        let openapi = ApiDoc::openapi();

        assert!(openapi.components.is_some());
        let components = openapi.components.as_ref().unwrap();

        for name in ["ErrorResponse", "HealthResponse", "ProfileDto", "ProfilePage", "Role", "SessionDto"] {
            assert!(components.schemas.contains_key(name), "missing schema {}", name);
        }

        // Verify that the schema can be serialized to JSON without errors
        let json_result = serde_json::to_string(&openapi);
        assert!(json_result.is_ok());
    }

    #[test]
    fn test_error_response_schema_structure() {
        let openapi = ApiDoc::openapi();
        let components = openapi.components.as_ref().unwrap();
        let error_response_schema = components.schemas.get("ErrorResponse").unwrap();

        if let utoipa::openapi::RefOr::T(utoipa::openapi::schema::Schema::Object(obj)) = error_response_schema {
            let properties = &obj.properties;
            assert!(properties.contains_key("error"));
            assert!(properties.contains_key("code"));
            assert!(properties.contains_key("success"));
        } else {
            panic!("ErrorResponse should be an object schema");
        }
    }

    #[test]
    fn test_every_route_is_documented() {
        let openapi = ApiDoc::openapi();
        let paths = &openapi.paths.paths;

        for path in [
            "/",
            "/health",
            "/auth/login",
            "/auth/logout",
            "/auth/sign-up",
            "/auth/session",
            "/dashboard/superadmin",
            "/dashboard/superadmin/accounts",
            "/dashboard/superadmin/accounts/{id}",
            "/dashboard/superadmin/accounts/{id}/toggle-active",
            "/dashboard/admin",
            "/dashboard/admin/cashiers",
            "/dashboard/admin/cashiers/{id}",
            "/dashboard/admin/cashiers/{id}/toggle-active",
            "/dashboard/cashier",
            "/dashboard/cashier/profile",
        ] {
            assert!(paths.contains_key(path), "undocumented path {}", path);
        }
    }

    #[test]
    fn test_role_schema_lists_every_tier() {
        let json = serde_json::to_value(ApiDoc::openapi()).unwrap();
        let values = &json["components"]["schemas"]["Role"]["enum"];
        assert_eq!(values, &serde_json::json!(["SUPERADMIN", "ADMIN", "CASHIER"]));
    }
}
