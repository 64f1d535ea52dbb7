//! Smoke tests for a deployed CMS API.
//!
//! Each check is a single HTTP request whose status code is compared with the
//! expected one. Transport and decoding failures are counted as failed checks
//! rather than aborting the run.

use reqwest::{Client, Method, StatusCode};
use serde_json::Value;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://fire-content-hub.preview.emergentagent.com";
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const BODY_PREVIEW_CHARS: usize = 200;

#[derive(Debug, Clone, PartialEq)]
pub enum TestStatus {
    Passed { status: u16 },
    UnexpectedStatus { expected: u16, actual: u16 },
    NetworkError(String),
    Error(String),
}

impl TestStatus {
    pub fn passed(&self) -> bool {
        matches!(self, TestStatus::Passed { .. })
    }
}

#[derive(Debug, Clone)]
pub struct TestOutcome {
    pub name: String,
    pub status: TestStatus,
    /// Parsed JSON body of a passing response; `Null` otherwise.
    pub body: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SmokeSummary {
    pub tests_run: usize,
    pub tests_passed: usize,
}

impl SmokeSummary {
    pub fn all_passed(&self) -> bool {
        self.tests_passed == self.tests_run
    }

    /// Percentage of passing checks; `None` when nothing ran.
    pub fn success_rate(&self) -> Option<f64> {
        (self.tests_run > 0).then(|| self.tests_passed as f64 / self.tests_run as f64 * 100.0)
    }

    pub fn exit_code(&self) -> u8 {
        if self.all_passed() {
            0
        } else {
            1
        }
    }
}

pub struct SmokeTester {
    client: Client,
    base_url: String,
    outcomes: Vec<TestOutcome>,
}

impl SmokeTester {
    pub fn new(base_url: impl Into<String>) -> Result<Self, reqwest::Error> {
        Self::with_timeout(base_url, REQUEST_TIMEOUT)
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            outcomes: Vec::new(),
        })
    }

    pub fn outcomes(&self) -> &[TestOutcome] {
        &self.outcomes
    }

    pub fn summary(&self) -> SmokeSummary {
        SmokeSummary {
            tests_run: self.outcomes.len(),
            tests_passed: self.outcomes.iter().filter(|o| o.status.passed()).count(),
        }
    }

    /// Run one check and record its outcome.
    pub async fn run_test(
        &mut self,
        name: &str,
        method: Method,
        endpoint: &str,
        expected_status: StatusCode,
        data: Option<&Value>,
    ) -> &TestOutcome {
        let url = format!("{}/{}", self.base_url, endpoint);
        println!("\nTesting {}...", name);

        let (status, body) = match self.execute(method, &url, expected_status, data).await {
            Ok(result) => result,
            Err(e) if !e.is_timeout() && (e.is_decode() || e.is_body()) => {
                println!("FAILED - Error: {}", e);
                (TestStatus::Error(e.to_string()), Value::Null)
            }
            Err(e) => {
                println!("FAILED - Network Error: {}", e);
                (TestStatus::NetworkError(e.to_string()), Value::Null)
            }
        };

        tracing::debug!(test = %name, url = %url, status = ?status, "Smoke test finished");

        self.outcomes.push(TestOutcome {
            name: name.to_string(),
            status,
            body,
        });
        &self.outcomes[self.outcomes.len() - 1]
    }

    async fn execute(
        &self,
        method: Method,
        url: &str,
        expected_status: StatusCode,
        data: Option<&Value>,
    ) -> Result<(TestStatus, Value), reqwest::Error> {
        let mut request = self
            .client
            .request(method, url)
            .header(reqwest::header::CONTENT_TYPE, "application/json");
        if let Some(data) = data {
            request = request.json(data);
        }

        let response = request.send().await?;
        let actual = response.status();
        let text = response.text().await?;

        if actual != expected_status {
            println!(
                "FAILED - Expected {}, got {}",
                expected_status.as_u16(),
                actual.as_u16()
            );
            println!("   Response: {}", preview(&text));
            return Ok((
                TestStatus::UnexpectedStatus {
                    expected: expected_status.as_u16(),
                    actual: actual.as_u16(),
                },
                Value::Null,
            ));
        }

        println!("Passed - Status: {}", actual.as_u16());
        let body = if text.is_empty() {
            Value::Null
        } else {
            match serde_json::from_str::<Value>(&text) {
                Ok(json) => {
                    let pretty = serde_json::to_string_pretty(&json).unwrap_or_default();
                    println!("   Response: {}", pretty);
                    json
                }
                Err(_) => {
                    println!("   Response: {}", preview(&text));
                    Value::Null
                }
            }
        };

        Ok((
            TestStatus::Passed {
                status: actual.as_u16(),
            },
            body,
        ))
    }

    pub async fn test_api_root(&mut self) -> &TestOutcome {
        self.run_test("API Root", Method::GET, "api/", StatusCode::OK, None)
            .await
    }

    pub async fn test_health_check(&mut self) -> &TestOutcome {
        self.run_test("Health Check", Method::GET, "api/health", StatusCode::OK, None)
            .await
    }
}

fn preview(text: &str) -> String {
    text.chars().take(BODY_PREVIEW_CHARS).collect()
}

/// Run the API root and health checks and print the summary.
pub async fn run_smoke_tests(tester: &mut SmokeTester) -> SmokeSummary {
    println!("Starting CMS Backend API Tests");
    println!("{}", "=".repeat(50));

    println!("\nTesting Basic API Endpoints...");
    tester.test_api_root().await;
    tester.test_health_check().await;

    let summary = tester.summary();

    println!("\n{}", "=".repeat(50));
    println!("Backend Tests Summary:");
    println!("   Tests Run: {}", summary.tests_run);
    println!("   Tests Passed: {}", summary.tests_passed);
    match summary.success_rate() {
        Some(rate) => println!("   Success Rate: {:.1}%", rate),
        None => println!("No tests run"),
    }

    if summary.all_passed() {
        println!("All backend tests passed!");
    } else {
        println!("Some backend tests failed!");
    }

    summary
}
