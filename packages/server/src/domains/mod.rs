// Domain modules - business logic organized by feature area

pub mod transcription;
