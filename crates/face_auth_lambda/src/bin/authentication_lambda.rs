use face_auth_lambda::adapters::aws::{
    load_sdk_config, DynamoEmployeeTable, RekognitionFaceIndex, S3ObjectStore,
};
use face_auth_lambda::config::HandlerSettings;
use face_auth_lambda::handlers::authentication::{
    handle_authentication_event, AuthenticationContext,
};
use face_auth_lambda::handlers::response::ApiGatewayResponse;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;

type AwsAuthenticationContext =
    AuthenticationContext<S3ObjectStore, RekognitionFaceIndex, DynamoEmployeeTable>;

async fn handle_request(
    event: LambdaEvent<Value>,
    context: &AwsAuthenticationContext,
) -> Result<ApiGatewayResponse, Error> {
    Ok(handle_authentication_event(&event.payload, context))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let settings = HandlerSettings::from_env()?;
    let sdk_config = load_sdk_config().await;

    let context = AuthenticationContext {
        storage: S3ObjectStore::new(
            aws_sdk_s3::Client::new(&sdk_config),
            settings.visitor_bucket.clone(),
        ),
        faces: RekognitionFaceIndex::new(
            aws_sdk_rekognition::Client::new(&sdk_config),
            settings.collection_id.clone(),
            settings.face_match_threshold,
        ),
        employees: DynamoEmployeeTable::new(
            aws_sdk_dynamodb::Client::new(&sdk_config),
            settings.employee_table.clone(),
        ),
        settings,
    };

    lambda_runtime::run(service_fn(|event| handle_request(event, &context))).await
}
