use crate::grammar::Verb;

/// Usage text for a docker verb. Only the six core verbs carry help; every
/// other name gets a generic fallback.
pub fn get_command_help(action: &str) -> String {
    let text = match Verb::from_name(action) {
        Some(Verb::Run) => {
            "docker run [OPTIONS] IMAGE [COMMAND]

Create and start a new container from an image.

Examples:
  docker run nginx
  docker run -d -p 8080:80 --name my-web nginx

Options:
  -d, --detach       Run container in background
  -p, --publish      Publish container ports to host
  --name            Assign a name to the container"
        }
        Some(Verb::Ps) => {
            "docker ps [OPTIONS]

List running containers.

Examples:
  docker ps
  docker ps -a

Options:
  -a, --all         Show all containers (including stopped)"
        }
        Some(Verb::Stop) => {
            "docker stop CONTAINER

Stop one or more running containers.

Examples:
  docker stop my-container
  docker stop container-id"
        }
        Some(Verb::Rm) => {
            "docker rm [OPTIONS] CONTAINER

Remove one or more containers.

Examples:
  docker rm my-container
  docker rm -f my-container

Options:
  -f, --force       Force removal of running container"
        }
        Some(Verb::Images) => {
            "docker images [OPTIONS]

List available images.

Examples:
  docker images
  docker images -a

Options:
  -a, --all         Show all images"
        }
        Some(Verb::Pull) => {
            "docker pull IMAGE[:TAG]

Download an image from a registry.

Examples:
  docker pull nginx
  docker pull nginx:alpine"
        }
        _ => return format!("No help available for '{}'", action),
    };
    text.to_string()
}
