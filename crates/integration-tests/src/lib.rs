//! Integration test support for the T-Express storefront client.
//!
//! [`MockBackend`] serves a small in-memory imitation of the T-Express API
//! with axum on an ephemeral port. It keeps accounts, tokens, carts and
//! wishlists, records every request it receives, and can be told to fail
//! specific calls.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p texpress-integration-tests
//! ```

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, Method, StatusCode, header::AUTHORIZATION};
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use axum::{Json, Router};
use serde_json::{Value, json};
use texpress_storefront::{AppContext, Config};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// A request as received by the mock.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    /// Path below `/api/`, e.g. `panier/supprimer`.
    pub path: String,
    pub body: Value,
    /// Bearer token, when one was sent.
    pub bearer: Option<String>,
}

/// Mock T-Express API server. Stopped when dropped.
pub struct MockBackend {
    api_url: String,
    state: Arc<MockState>,
    server: JoinHandle<()>,
}

#[derive(Default)]
struct MockState {
    db: Mutex<Db>,
    requests: Mutex<Vec<Recorded>>,
    delays: Mutex<HashMap<String, Duration>>,
}

impl MockBackend {
    /// Bind to `127.0.0.1:0` and start serving.
    ///
    /// # Panics
    ///
    /// Panics if no local port can be bound.
    pub async fn start() -> Self {
        let state = Arc::new(MockState::default());
        let app = Router::new()
            .route("/api/{*path}", any(dispatch))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock API listener");
        let addr = listener
            .local_addr()
            .expect("Mock API listener has no local address");

        let server = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            api_url: format!("http://{addr}/api"),
            state,
            server,
        }
    }

    /// Base URL to point the client at.
    #[must_use]
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Client configuration targeting this mock.
    ///
    /// # Panics
    ///
    /// Panics if the mock URL is rejected, which would be a bug here.
    #[must_use]
    pub fn config(&self) -> Config {
        Config::for_api_url(&self.api_url).expect("Mock API URL should be valid")
    }

    /// An in-memory-session context with every store provided.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built.
    #[must_use]
    pub fn context(&self) -> AppContext {
        AppContext::in_memory(self.config())
            .expect("Failed to build application context")
            .with_all_stores()
    }

    /// Register an account. Returns its client id.
    pub fn add_account(&self, email: &str, password: &str, nom: &str) -> i64 {
        self.db().create_account(email, password, nom)
    }

    /// Add a catalogue product.
    pub fn add_produit(&self, id: i64, nom: &str, prix: i64, en_vedette: bool) {
        self.db().produits.push(ProduitRow {
            id,
            nom: nom.to_string(),
            prix,
            en_vedette,
        });
    }

    /// Make `panier/supprimer` fail with a 500 for this line.
    pub fn fail_delete_of(&self, ligne_id: i64) {
        self.db().failing_deletes.insert(ligne_id);
    }

    /// Make `client/deconnexion` fail with a 500.
    pub fn fail_logout(&self) {
        self.db().logout_fails = true;
    }

    /// Replace the category list served by `categories`.
    pub fn set_categories(&self, categories: Value) {
        self.db().categories = categories;
    }

    /// Replace the stock list served by `admin/stocks`.
    pub fn set_stocks(&self, stocks: Value) {
        self.db().stocks = stocks;
    }

    /// Hold every response on `path` back for `delay`. The request is
    /// recorded on arrival; it is handled once the delay has elapsed.
    pub fn delay(&self, path: &str, delay: Duration) {
        lock(&self.state.delays).insert(path.to_string(), delay);
    }

    /// Wait until `count` requests have arrived on `path`.
    pub async fn wait_for_requests(&self, path: &str, count: usize) {
        while self.count(path) < count {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }

    /// Number of lines in a client's server-side cart.
    #[must_use]
    pub fn cart_len(&self, client_id: i64) -> usize {
        self.db().carts.get(&client_id).map_or(0, Vec::len)
    }

    /// Invalidate `token` server-side, as an expiry would.
    pub fn revoke_token(&self, token: &str) {
        self.db().tokens.remove(token);
    }

    /// Whether `token` is still accepted.
    #[must_use]
    pub fn token_is_valid(&self, token: &str) -> bool {
        self.db().tokens.contains_key(token)
    }

    /// Requests received on `path`, oldest first.
    #[must_use]
    pub fn requests(&self, path: &str) -> Vec<Recorded> {
        lock(&self.state.requests)
            .iter()
            .filter(|r| r.path == path)
            .cloned()
            .collect()
    }

    /// Number of requests received on `path`.
    #[must_use]
    pub fn count(&self, path: &str) -> usize {
        self.requests(path).len()
    }

    fn db(&self) -> MutexGuard<'_, Db> {
        lock(&self.state.db)
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.server.abort();
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

async fn dispatch(
    State(state): State<Arc<MockState>>,
    method: Method,
    Path(path): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let body: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    let bearer = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(ToString::to_string);

    lock(&state.requests).push(Recorded {
        method: method.to_string(),
        path: path.clone(),
        body: body.clone(),
        bearer: bearer.clone(),
    });

    let delay = lock(&state.delays).get(&path).copied();
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    let result = lock(&state.db).route(&method, &path, &body, bearer.as_deref());
    match result {
        Ok(value) => (StatusCode::OK, Json(value)).into_response(),
        Err((status, value)) => (status, Json(value)).into_response(),
    }
}

// =============================================================================
// In-memory API
// =============================================================================

type Failure = (StatusCode, Value);

struct Account {
    id: i64,
    email: String,
    password: String,
    nom: String,
    prenom: Option<String>,
    telephone: Option<String>,
}

impl Account {
    fn json(&self) -> Value {
        json!({
            "id": self.id,
            "nom": self.nom,
            "prenom": self.prenom,
            "email": self.email,
            "telephone": self.telephone,
            "role": "client",
        })
    }
}

struct ProduitRow {
    id: i64,
    nom: String,
    prix: i64,
    en_vedette: bool,
}

impl ProduitRow {
    fn json(&self) -> Value {
        json!({
            "id": self.id,
            "nom": self.nom,
            "prix": format!("{}.00", self.prix),
            "images": "[]",
            "en_vedette": i32::from(self.en_vedette),
            "est_nouveau": 0,
        })
    }
}

struct Line {
    id: i64,
    produit_id: i64,
    quantite: u32,
}

#[derive(Default)]
struct Db {
    accounts: Vec<Account>,
    tokens: HashMap<String, i64>,
    next_id: i64,
    produits: Vec<ProduitRow>,
    carts: HashMap<i64, Vec<Line>>,
    favoris: HashMap<i64, Vec<(i64, i64)>>,
    failing_deletes: BTreeSet<i64>,
    logout_fails: bool,
    categories: Value,
    stocks: Value,
}

fn error(status: StatusCode, message: &str) -> Failure {
    (status, json!({ "message": message }))
}

fn int(body: &Value, key: &str) -> Result<i64, Failure> {
    body.get(key).and_then(Value::as_i64).ok_or_else(|| {
        let mut errors = serde_json::Map::new();
        errors.insert(
            key.to_string(),
            json!([format!("Le champ {key} est obligatoire.")]),
        );
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            json!({ "message": "Les données sont invalides.", "errors": errors }),
        )
    })
}

fn text<'a>(body: &'a Value, key: &str) -> Option<&'a str> {
    body.get(key).and_then(Value::as_str)
}

impl Db {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn create_account(&mut self, email: &str, password: &str, nom: &str) -> i64 {
        let id = self.next_id();
        self.accounts.push(Account {
            id,
            email: email.to_string(),
            password: password.to_string(),
            nom: nom.to_string(),
            prenom: None,
            telephone: None,
        });
        id
    }

    fn issue_token(&mut self, client_id: i64) -> String {
        let token = format!("tok-{client_id}-{}", self.next_id());
        self.tokens.insert(token.clone(), client_id);
        token
    }

    fn authenticate(&self, bearer: Option<&str>) -> Result<i64, Failure> {
        bearer
            .and_then(|token| self.tokens.get(token).copied())
            .ok_or_else(|| error(StatusCode::UNAUTHORIZED, "Unauthenticated."))
    }

    fn account(&self, client_id: i64) -> Result<&Account, Failure> {
        self.accounts
            .iter()
            .find(|a| a.id == client_id)
            .ok_or_else(|| error(StatusCode::NOT_FOUND, "Client introuvable."))
    }

    fn produit(&self, produit_id: i64) -> Result<&ProduitRow, Failure> {
        self.produits
            .iter()
            .find(|p| p.id == produit_id)
            .ok_or_else(|| error(StatusCode::NOT_FOUND, "Produit introuvable."))
    }

    fn route(
        &mut self,
        method: &Method,
        path: &str,
        body: &Value,
        bearer: Option<&str>,
    ) -> Result<Value, Failure> {
        match (method.as_str(), path) {
            ("POST", "client/connexion") => {
                let email = text(body, "email").unwrap_or_default();
                let password = text(body, "password").unwrap_or_default();
                let client_id = self
                    .accounts
                    .iter()
                    .find(|a| a.email == email && a.password == password)
                    .map(|a| a.id)
                    .ok_or_else(|| error(StatusCode::UNAUTHORIZED, "Identifiants invalides."))?;
                let token = self.issue_token(client_id);
                Ok(json!({ "client": self.account(client_id)?.json(), "token": token }))
            }
            ("POST", "client/inscription") => {
                let email = text(body, "email").unwrap_or_default().to_string();
                if self.accounts.iter().any(|a| a.email == email) {
                    return Err((
                        StatusCode::UNPROCESSABLE_ENTITY,
                        json!({
                            "message": "Les données sont invalides.",
                            "errors": { "email": ["L'email est déjà utilisé."] }
                        }),
                    ));
                }
                let password = text(body, "password").unwrap_or_default().to_string();
                let nom = text(body, "nom").unwrap_or_default().to_string();
                let client_id = self.create_account(&email, &password, &nom);
                if let Some(account) = self.accounts.iter_mut().find(|a| a.id == client_id) {
                    account.prenom = text(body, "prenom").map(ToString::to_string);
                    account.telephone = text(body, "telephone").map(ToString::to_string);
                }
                let token = self.issue_token(client_id);
                Ok(json!({ "client": self.account(client_id)?.json(), "token": token }))
            }
            ("POST", "client/deconnexion") => {
                self.authenticate(bearer)?;
                if self.logout_fails {
                    return Err(error(StatusCode::INTERNAL_SERVER_ERROR, "Erreur serveur."));
                }
                if let Some(token) = bearer {
                    self.tokens.remove(token);
                }
                Ok(json!({ "message": "Déconnexion réussie." }))
            }
            ("POST", "client/profil") => {
                let client_id = self.authenticate(bearer)?;
                Ok(json!({ "client": self.account(client_id)?.json() }))
            }
            ("POST", "client/profil/modifier") => {
                let client_id = self.authenticate(bearer)?;
                if let Some(account) = self.accounts.iter_mut().find(|a| a.id == client_id) {
                    if let Some(nom) = text(body, "nom") {
                        account.nom = nom.to_string();
                    }
                    if let Some(prenom) = text(body, "prenom") {
                        account.prenom = Some(prenom.to_string());
                    }
                    if let Some(telephone) = text(body, "telephone") {
                        account.telephone = Some(telephone.to_string());
                    }
                }
                Ok(json!({
                    "client": self.account(client_id)?.json(),
                    "message": "Profil mis à jour."
                }))
            }
            ("GET", "admin/clients") => {
                self.authenticate(bearer)?;
                let clients: Vec<Value> = self.accounts.iter().map(Account::json).collect();
                Ok(json!({ "clients": clients }))
            }
            ("POST", "catalogue/rechercher") => Ok(self.search(body)),
            ("POST", "catalogue/produit") => {
                let produit_id = int(body, "produit_id")?;
                Ok(json!({ "produit": self.produit(produit_id)?.json() }))
            }
            ("POST", "panier/contenu") => {
                let client_id = self.authenticate(bearer)?;
                Ok(json!({ "panier": self.cart(client_id) }))
            }
            ("POST", "panier/ajouter") => {
                let client_id = self.authenticate(bearer)?;
                let produit_id = int(body, "produit_id")?;
                let quantite = u32::try_from(int(body, "quantite")?).unwrap_or(1);
                self.produit(produit_id)?;
                let ligne_id = self.next_id();
                let lines = self.carts.entry(client_id).or_default();
                match lines.iter_mut().find(|l| l.produit_id == produit_id) {
                    Some(line) => line.quantite += quantite,
                    None => lines.push(Line {
                        id: ligne_id,
                        produit_id,
                        quantite,
                    }),
                }
                Ok(json!({ "panier": self.cart(client_id), "message": "Produit ajouté au panier." }))
            }
            ("POST", "panier/modifier") => {
                let client_id = self.authenticate(bearer)?;
                let ligne_id = int(body, "ligne_id")?;
                let quantite = u32::try_from(int(body, "quantite")?).unwrap_or(0);
                let lines = self.carts.entry(client_id).or_default();
                let line = lines
                    .iter_mut()
                    .find(|l| l.id == ligne_id)
                    .ok_or_else(|| error(StatusCode::NOT_FOUND, "Ligne introuvable."))?;
                line.quantite = quantite;
                lines.retain(|l| l.quantite > 0);
                Ok(json!({ "panier": self.cart(client_id) }))
            }
            ("POST", "panier/supprimer") => {
                let client_id = self.authenticate(bearer)?;
                let ligne_id = int(body, "ligne_id")?;
                if self.failing_deletes.contains(&ligne_id) {
                    return Err(error(StatusCode::INTERNAL_SERVER_ERROR, "Erreur serveur."));
                }
                let lines = self.carts.entry(client_id).or_default();
                let before = lines.len();
                lines.retain(|l| l.id != ligne_id);
                if lines.len() == before {
                    return Err(error(StatusCode::NOT_FOUND, "Ligne introuvable."));
                }
                Ok(json!({ "panier": self.cart(client_id) }))
            }
            ("POST", "favoris/liste") => {
                let client_id = self.authenticate(bearer)?;
                let favoris: Vec<Value> = self
                    .favoris
                    .get(&client_id)
                    .into_iter()
                    .flatten()
                    .map(|&(id, produit_id)| self.favori(id, produit_id))
                    .collect();
                Ok(json!({ "favoris": favoris }))
            }
            ("POST", "favoris/ajouter") => {
                let client_id = self.authenticate(bearer)?;
                let produit_id = int(body, "produit_id")?;
                let (id, _) = self.add_favori(client_id, produit_id)?;
                Ok(json!({ "favori": self.favori(id, produit_id), "message": "Ajouté aux favoris." }))
            }
            ("POST", "favoris/retirer") => {
                let client_id = self.authenticate(bearer)?;
                let produit_id = int(body, "produit_id")?;
                self.favoris
                    .entry(client_id)
                    .or_default()
                    .retain(|&(_, p)| p != produit_id);
                Ok(json!({ "message": "Retiré des favoris." }))
            }
            ("POST", "favoris/basculer") => {
                let client_id = self.authenticate(bearer)?;
                let produit_id = int(body, "produit_id")?;
                let present = self
                    .favoris
                    .get(&client_id)
                    .is_some_and(|f| f.iter().any(|&(_, p)| p == produit_id));
                if present {
                    self.favoris
                        .entry(client_id)
                        .or_default()
                        .retain(|&(_, p)| p != produit_id);
                    Ok(json!({ "est_favori": false, "message": "Retiré des favoris." }))
                } else {
                    let (id, _) = self.add_favori(client_id, produit_id)?;
                    Ok(json!({
                        "est_favori": true,
                        "favori": self.favori(id, produit_id),
                        "message": "Ajouté aux favoris."
                    }))
                }
            }
            ("POST", "categories") => Ok(json!({ "categories": self.categories.clone() })),
            ("GET", "admin/stocks") => {
                self.authenticate(bearer)?;
                Ok(json!({ "stocks": self.stocks.clone() }))
            }
            _ => Err(error(StatusCode::NOT_FOUND, "Route introuvable.")),
        }
    }

    fn search(&self, body: &Value) -> Value {
        let featured_only = body.get("en_vedette").and_then(Value::as_bool) == Some(true);
        let q = text(body, "q").map(str::to_lowercase);
        let per_page = body.get("per_page").and_then(Value::as_u64).unwrap_or(12);
        let page = body.get("page").and_then(Value::as_u64).unwrap_or(1).max(1);

        let matching: Vec<&ProduitRow> = self
            .produits
            .iter()
            .filter(|p| !featured_only || p.en_vedette)
            .filter(|p| {
                q.as_ref()
                    .is_none_or(|q| p.nom.to_lowercase().contains(q.as_str()))
            })
            .collect();

        let total = matching.len() as u64;
        let last_page = total.div_ceil(per_page.max(1)).max(1);
        let skip = usize::try_from((page - 1) * per_page).unwrap_or(usize::MAX);
        let take = usize::try_from(per_page).unwrap_or(usize::MAX);
        let data: Vec<Value> = matching
            .into_iter()
            .skip(skip)
            .take(take)
            .map(ProduitRow::json)
            .collect();

        json!({
            "produits": {
                "data": data,
                "current_page": page,
                "last_page": last_page,
                "per_page": per_page,
                "total": total,
            }
        })
    }

    fn cart(&self, client_id: i64) -> Value {
        let mut total = 0_i64;
        let mut articles = 0_u32;
        let lignes: Vec<Value> = self
            .carts
            .get(&client_id)
            .into_iter()
            .flatten()
            .map(|line| {
                let prix = self.produit(line.produit_id).map_or(0, |p| p.prix);
                let sous_total = prix * i64::from(line.quantite);
                total += sous_total;
                articles += line.quantite;
                json!({
                    "id": line.id,
                    "produit_id": line.produit_id,
                    "produit": self.produit(line.produit_id).ok().map(ProduitRow::json),
                    "quantite": line.quantite,
                    "prix_unitaire": format!("{prix}.00"),
                    "sous_total": format!("{sous_total}.00"),
                })
            })
            .collect();

        json!({
            "lignes": lignes,
            "total": format!("{total}.00"),
            "nombre_articles": articles,
        })
    }

    fn add_favori(&mut self, client_id: i64, produit_id: i64) -> Result<(i64, bool), Failure> {
        self.produit(produit_id)?;
        if let Some(&(id, _)) = self
            .favoris
            .get(&client_id)
            .and_then(|f| f.iter().find(|&&(_, p)| p == produit_id))
        {
            return Ok((id, false));
        }
        let id = self.next_id();
        self.favoris
            .entry(client_id)
            .or_default()
            .push((id, produit_id));
        Ok((id, true))
    }

    fn favori(&self, id: i64, produit_id: i64) -> Value {
        json!({
            "id": id,
            "produit_id": produit_id,
            "produit": self.produit(produit_id).ok().map(ProduitRow::json),
        })
    }
}
