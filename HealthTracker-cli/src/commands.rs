// Command-line parsing and execution
//
// Every command runs against an `EntityServiceTrait`, so the same code drives
// the REST services and the in-memory ones used in tests.

use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, bail, Context};
use serde_json::{json, Value};
use tracing::{info, instrument, warn};
use validator::{Validate, ValidationErrors};

use health_tracker_data::{
    create_default_blood_pressure_service, create_default_points_service, create_default_preferences_service,
    create_default_weight_service, ClientConfig, EntityServiceTrait,
};
use health_tracker_domain::{Entity, RequestOptions};

pub const USAGE: &str = "\
Usage: health-tracker <entity> <command> [args]

Entities:
  blood-pressures | preferences | weights | points

Commands:
  list [page] [size]   List one page of entities
  get <id>             Show one entity
  create <json>        Create an entity from JSON
  update <json>        Update an entity from JSON (must carry its id)
  delete <id>          Delete an entity";

/// Entity collection selected on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    BloodPressures,
    Preferences,
    Weights,
    Points,
}

impl FromStr for EntityKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "blood-pressures" => Ok(EntityKind::BloodPressures),
            "preferences" => Ok(EntityKind::Preferences),
            "weights" => Ok(EntityKind::Weights),
            "points" => Ok(EntityKind::Points),
            other => Err(anyhow!("Unknown entity: {}", other)),
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::BloodPressures => "blood-pressures",
            EntityKind::Preferences => "preferences",
            EntityKind::Weights => "weights",
            EntityKind::Points => "points",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List { page: Option<u32>, size: Option<u32> },
    Get { id: i64 },
    Create { json: String },
    Update { json: String },
    Delete { id: i64 },
}

/// A parsed command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub entity: EntityKind,
    pub command: Command,
}

impl Invocation {
    /// Parse the arguments following the program name
    pub fn parse<I, S>(args: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();

        let (entity, command, rest) = match args.as_slice() {
            [entity, command, rest @ ..] => (entity.parse::<EntityKind>()?, command.as_str(), rest),
            _ => bail!("Expected an entity and a command"),
        };

        let command = match (command, rest) {
            ("list", [page, size]) => Command::List {
                page: Some(parse_number(page, "page")?),
                size: Some(parse_number(size, "size")?),
            },
            ("list", [page]) => Command::List {
                page: Some(parse_number(page, "page")?),
                size: None,
            },
            ("list", []) => Command::List { page: None, size: None },
            ("get", [id]) => Command::Get {
                id: parse_number(id, "id")?,
            },
            ("delete", [id]) => Command::Delete {
                id: parse_number(id, "id")?,
            },
            ("create", [json]) => Command::Create { json: json.clone() },
            ("update", [json]) => Command::Update { json: json.clone() },
            (command, _) => bail!("Invalid arguments for command '{}'", command),
        };

        Ok(Self { entity, command })
    }
}

fn parse_number<T: FromStr>(value: &str, name: &str) -> anyhow::Result<T> {
    value
        .parse()
        .map_err(|_| anyhow!("Invalid {}: '{}' is not a number", name, value))
}

/// Join validation errors into a single message, e.g.
/// `systolic: Systolic must be between 40 and 300`
pub fn describe_validation_errors(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .map(|(field, errors)| {
            let error_msgs: Vec<String> = errors
                .iter()
                .map(|err| match &err.message {
                    Some(msg) => msg.to_string(),
                    None => format!("Invalid {}", field),
                })
                .collect();
            format!("{}: {}", field, error_msgs.join(", "))
        })
        .collect();
    // field_errors is a HashMap
    messages.sort();
    messages.join("; ")
}

fn parse_entity<E: Entity + Validate>(json: &str) -> anyhow::Result<E> {
    let entity: E = serde_json::from_str(json).with_context(|| format!("Invalid {} JSON", E::ENTITY_NAME))?;

    if let Err(errors) = entity.validate() {
        let message = describe_validation_errors(&errors);
        warn!("Invalid {} data: {}", E::ENTITY_NAME, message);
        bail!("Validation failed: {}", message);
    }

    Ok(entity)
}

/// Run one command against a service and return what should be printed
#[instrument(skip(service), fields(entity = E::ENTITY_NAME))]
pub async fn execute<E, S>(service: &S, command: &Command) -> anyhow::Result<Value>
where
    E: Entity + Validate,
    S: EntityServiceTrait<E> + ?Sized,
{
    match command {
        Command::List { page, size } => {
            let mut options = RequestOptions::new();
            if let Some(page) = page {
                options = options.page(*page);
            }
            if let Some(size) = size {
                options = options.size(*size);
            }

            let response = service.query(Some(&options)).await?;
            let links = response.links()?;
            match response.total_count()? {
                Some(total) => info!("{} of {} {} entities, links: {:?}", response.len(), total, E::ENTITY_NAME, links),
                None => info!("{} {} entities, links: {:?}", response.len(), E::ENTITY_NAME, links),
            }

            Ok(serde_json::to_value(response.into_items())?)
        }
        Command::Get { id } => Ok(serde_json::to_value(service.find(*id).await?)?),
        Command::Create { json } => {
            let entity: E = parse_entity(json)?;
            let created = service.create(&entity).await?;
            info!("Created {} with ID: {:?}", E::ENTITY_NAME, created.id());
            Ok(serde_json::to_value(created)?)
        }
        Command::Update { json } => {
            let entity: E = parse_entity(json)?;
            if entity.id().is_none() {
                bail!("Cannot update a {} without an id", E::ENTITY_NAME);
            }
            Ok(serde_json::to_value(service.update(&entity).await?)?)
        }
        Command::Delete { id } => {
            let response = service.delete(*id).await?;
            let alert = response.alert();
            info!("Deleted {} {}", E::ENTITY_NAME, id);
            Ok(json!({
                "status": response.status.as_u16(),
                "alert": alert.as_ref().map(|a| a.message.clone()),
                "param": alert.and_then(|a| a.param),
            }))
        }
    }
}

/// Run an invocation against the backend described by `config`
pub async fn run(config: &ClientConfig, invocation: &Invocation) -> anyhow::Result<Value> {
    info!("Running {} on {}", invocation.entity, config.base_url);

    match invocation.entity {
        EntityKind::BloodPressures => {
            execute(&create_default_blood_pressure_service(config)?, &invocation.command).await
        }
        EntityKind::Preferences => execute(&create_default_preferences_service(config)?, &invocation.command).await,
        EntityKind::Weights => execute(&create_default_weight_service(config)?, &invocation.command).await,
        EntityKind::Points => execute(&create_default_points_service(config)?, &invocation.command).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use health_tracker_data::testing::MockEntityService;
    use health_tracker_domain::{BloodPressure, Preferences, Weight};

    fn reading(day: u32) -> BloodPressure {
        BloodPressure::new(NaiveDate::from_ymd_opt(2024, 3, day).unwrap(), 120, 80)
    }

    #[test]
    fn test_parse_list() {
        let invocation = Invocation::parse(["weights", "list", "2", "10"]).unwrap();
        assert_eq!(invocation.entity, EntityKind::Weights);
        assert_eq!(
            invocation.command,
            Command::List {
                page: Some(2),
                size: Some(10)
            }
        );

        let invocation = Invocation::parse(["points", "list"]).unwrap();
        assert_eq!(invocation.command, Command::List { page: None, size: None });
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(Invocation::parse(["weights"]).is_err());
        assert!(Invocation::parse(["heights", "list"]).is_err());
        assert!(Invocation::parse(["weights", "get"]).is_err());
        assert!(Invocation::parse(["weights", "get", "abc"]).is_err());
        assert!(Invocation::parse(["weights", "frobnicate", "1"]).is_err());
    }

    #[test]
    fn test_parse_create() {
        let invocation = Invocation::parse(["blood-pressures", "create", r#"{"systolic":120}"#]).unwrap();
        assert_eq!(invocation.entity, EntityKind::BloodPressures);
        assert_eq!(
            invocation.command,
            Command::Create {
                json: r#"{"systolic":120}"#.to_string()
            }
        );
    }

    #[test]
    fn test_entity_kind_display_round_trips() {
        for kind in [
            EntityKind::BloodPressures,
            EntityKind::Preferences,
            EntityKind::Weights,
            EntityKind::Points,
        ] {
            assert_eq!(kind.to_string().parse::<EntityKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_create_validates_input() {
        let service = MockEntityService::<BloodPressure>::new();
        let command = Command::Create {
            json: r#"{"date":"2024-03-01","systolic":20,"diastolic":80}"#.to_string(),
        };

        let err = tokio_test::block_on(execute(&service, &command)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation failed: systolic: Systolic must be between 40 and 300"
        );
        assert!(service.is_empty());
    }

    #[test]
    fn test_create_prints_stored_entity() {
        let service = MockEntityService::<Weight>::new();
        let command = Command::Create {
            json: r#"{"date":"2024-03-01","weight":72.5}"#.to_string(),
        };

        let output = tokio_test::block_on(execute(&service, &command)).unwrap();
        assert_eq!(output, json!({"id": 1, "date": "2024-03-01", "weight": 72.5}));
    }

    #[tokio::test]
    async fn test_malformed_json_is_reported() {
        let service = MockEntityService::<Preferences>::new();
        let command = Command::Create {
            json: "{not json".to_string(),
        };

        let err = execute(&service, &command).await.unwrap_err();
        assert!(err.to_string().contains("Invalid preferences JSON"));
    }

    #[tokio::test]
    async fn test_list_get_and_delete() {
        let service = MockEntityService::new().with_entities(vec![reading(1), reading(2), reading(3)]);

        let page = execute(
            &service,
            &Command::List {
                page: Some(0),
                size: Some(2),
            },
        )
        .await
        .unwrap();
        assert_eq!(page.as_array().unwrap().len(), 2);

        let found = execute(&service, &Command::Get { id: 3 }).await.unwrap();
        assert_eq!(found["date"], "2024-03-03");

        let deleted = execute(&service, &Command::Delete { id: 3 }).await.unwrap();
        assert_eq!(
            deleted,
            json!({"status": 200, "alert": "healthTrackerApp.bloodPressure.deleted", "param": "3"})
        );

        let err = execute(&service, &Command::Get { id: 3 }).await.unwrap_err();
        assert!(err.to_string().contains("404"));
    }

    #[tokio::test]
    async fn test_update_requires_id() {
        let service = MockEntityService::<Preferences>::new();
        let command = Command::Update {
            json: r#"{"weeklyGoal":12,"weightUnits":"KG"}"#.to_string(),
        };

        let err = execute(&service, &command).await.unwrap_err();
        assert!(err.to_string().contains("without an id"));
        assert!(service.is_empty());
    }
}
