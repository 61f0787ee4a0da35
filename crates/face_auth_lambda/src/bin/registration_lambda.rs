use face_auth_lambda::adapters::aws::{load_sdk_config, DynamoEmployeeTable, RekognitionFaceIndex};
use face_auth_lambda::config::HandlerSettings;
use face_auth_lambda::handlers::registration::{handle_registration_event, RegistrationContext};
use face_auth_lambda::handlers::response::RegistrationResponse;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;

type AwsRegistrationContext = RegistrationContext<RekognitionFaceIndex, DynamoEmployeeTable>;

async fn handle_request(
    event: LambdaEvent<Value>,
    context: &AwsRegistrationContext,
) -> Result<RegistrationResponse, Error> {
    Ok(handle_registration_event(&event.payload, context))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let settings = HandlerSettings::from_env()?;
    let sdk_config = load_sdk_config().await;

    let context = RegistrationContext {
        faces: RekognitionFaceIndex::new(
            aws_sdk_rekognition::Client::new(&sdk_config),
            settings.collection_id.clone(),
            settings.face_match_threshold,
        ),
        employees: DynamoEmployeeTable::new(
            aws_sdk_dynamodb::Client::new(&sdk_config),
            settings.employee_table.clone(),
        ),
    };

    lambda_runtime::run(service_fn(|event| handle_request(event, &context))).await
}
