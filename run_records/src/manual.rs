/*!

This is the long-form manual for `run_records` and `ipcres`.

## Input formats

Each competition year publishes its results in its own layout. The layouts
(called providers) that are supported:
* `flat` one row per (track, planner, problem), IPC 2008
* `qualityMatrix` one row per problem and one column per planner, IPC 2014
* `solutionSeries` one row per (planner, problem) with all the solutions found over time, IPC 2011

### `flat`

Space separated, unquoted. Repeated spaces count as one separator.

```text
seq-sat lama transport-strips 1 OK 456 456 1.0
seq-sat c3 transport-strips 1 unsolved - 456 0.0
```

The columns are: track, planner, domain, problem, status, score, best score, quality.
The rows are selected by matching the track and the domain as substrings of the
first and third columns. Scores that are not integers are read as missing.

### `qualityMatrix`

Comma separated, quoted. The file of finished runs has the planners in the
header and a 0/1 flag for each problem:

```text
,jasper,mercury,best
p01,1,0,223
p02,1,1,310
total,2,1,
```

The last row (totals) is dropped. When a second file with the qualities is given,
it has the same shape with the quality ratio of each planner and the best
score in the last column; the finished file then has no best column. Without
quality file, the finished flag is the quality: a planner that finished has
the best score. An empty finished cell means the planner did not run on the
problem, and the run is `UNSOLVED`.

The score is reconstructed as `round(best / quality)`. Qualities below 0.01
do not allow this and the run is recorded without score.

### `solutionSeries`

Comma separated, quoted. The finished file has one row per planner and
problem (zero-based index in the third column) with two flags whose sum is the
status code (0 unsolved, 1 invalid, 2 valid). The time/score file lists the
times (in seconds) and the values of all the solutions found:

```text
planner,domain,problem,times,values
lama,transport,0,"3,17","560,523"
```

The best solution of a planner is the one with the lowest value, and the best
score of a problem is the lowest value over all the planners. Problems are
named `p01`, `p02`, ...

## Configuration

A competition year is described by a JSON file. Paths are relative to the
configuration file.

```json
{
  "competition": "ipc11",
  "provider": "solutionSeries",
  "delimiter": ",",
  "statusTable": {"2": "VALID", "1": "INVALID", "0": "UNSOLVED"},
  "excludedPlanners": ["popf2"],
  "conversions": [
    {
      "domain": "transport-strips",
      "track": "seq-sat",
      "filePath": "csv/transport-seq-sat.csv",
      "scoreFilePath": "csv/transport-seq-sat-time-score.csv",
      "outputFile": "transport-strips-seq-sat-ipc11-results.json"
    }
  ]
}
```

- `statusTable` (object, required): every raw status code mapped to one of
  `VALID`, `INVALID`, `UNSOLVED`, `SUBOPT`. A code missing from the table stops the
  conversion.
- `excludedPlanners` (array of strings, optional): planners left out of the output.
  They still count for the best scores.
- `delimiter` (one character, optional): `,` by default.
- `dropLastRow` (boolean, optional): drop the last row of every table.
- `conversions[].domainFilter` (string, optional, `flat` only): the text to look
  for in the domain column. The domain name by default.

The configurations of IPC 2008, 2011 and 2014 are built in (`--preset ipc08`, ...).

## Output

```json
{
    "runs": [
        {
            "actions": [],
            "domain": "transport-strips",
            "planner": "lama",
            "problem": "p1",
            "results": {
                "bestScore": 456,
                "durationMs": -1,
                "endTimeMs": 0,
                "exitStatus": "VALID",
                "quality": 1.0,
                "score": 456,
                "startTimeMs": 0
            },
            "temporalPlanActions": []
        }
    ]
}
```

The keys are sorted and indented with 4 spaces so that the files can be diffed.

 */
