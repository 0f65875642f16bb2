use futures::stream::StreamExt;
use mongodb::change_stream::event::ResumeToken;
use mongodb::error::{Error as MongoError, ErrorKind};
use std::{sync::Arc, time::Duration};

use crate::{
    app::AppState,
    constants::{APPOINTMENT_WATCH_RETRY_INTERVAL, CHANGE_STREAM_HISTORY_LOST},
    database::{record_from_document, AppDatabase},
};

/// Sends a confirmation for every appointment inserted into the database.
/// The change stream is reopened after the last handled insert when it fails,
/// the position survives restarts through the stored resume token
pub async fn appointment_watch_job(db: Arc<AppDatabase>, state: Arc<AppState>) {
    tracing::debug!("initializing appointment watch job");
    let mut resume_token = match db.load_watch_resume_token().await {
        Ok(token) => token,
        Err(err) => {
            tracing::warn!("not able to load watch resume token: {err}");
            None
        }
    };
    loop {
        if let Err(err) = watch_appointments(&db, &state, &mut resume_token).await {
            tracing::error!("appointment watch stopped: {err}");
            if is_history_lost(&err) {
                tracing::warn!("resume point is no longer available, watching from now on");
                resume_token = None;
                if let Err(err) = db.clear_watch_resume_token().await {
                    tracing::warn!("not able to clear watch resume token: {err}");
                }
            }
        }
        tokio::time::sleep(Duration::from_secs(APPOINTMENT_WATCH_RETRY_INTERVAL)).await;
    }
}

async fn watch_appointments(
    db: &AppDatabase,
    state: &Arc<AppState>,
    resume_token: &mut Option<ResumeToken>,
) -> Result<(), MongoError> {
    let mut stream = db.watch_appointment_inserts(resume_token.clone()).await?;
    tracing::info!("watching appointment inserts");
    while let Some(event) = stream.next().await {
        let event = event?;
        let coll = event.ns.and_then(|ns| ns.coll);
        let record = coll
            .zip(event.full_document)
            .and_then(|(coll, document)| record_from_document(&coll, document));
        if let Some(record) = record {
            let state = state.clone();
            tokio::spawn(async move {
                state.confirmation.on_appointment_created(&record).await;
            });
        }
        *resume_token = stream.resume_token();
        if let Some(token) = resume_token.as_ref() {
            if let Err(err) = db.save_watch_resume_token(token).await {
                tracing::warn!("not able to store watch resume token: {err}");
            }
        }
    }
    Ok(())
}

fn is_history_lost(err: &MongoError) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Command(cmd) if cmd.code == CHANGE_STREAM_HISTORY_LOST
    )
}
